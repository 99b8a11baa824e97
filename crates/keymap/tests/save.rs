//! Loading and saving `config.xml` on disk.

use std::fs;
use std::path::{Path, PathBuf};

use keymap::{
    is_read_only, set_read_only, ClientConfig, EditSession, KeymapError, Modifier,
    ProtectionPolicy, SaveError, UNKNOWN_EVENT,
};
use paths::InstallationPath;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CONFIG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Config>
	<!-- graphics -->
	<Graphics>
		<Width>1280</Width>
	</Graphics>
	<InputMappings>
		<RECORD>
			<Event>Move Forward</Event>
			<Key>W</Key>
			<Shift>0</Shift>
			<InputType>Key</InputType>
		</RECORD>
		<RECORD>
			<Event>Select Target</Event>
			<Key>MOUSE1</Key>
			<Ctrl>1</Ctrl>
			<InputType>Mouse</InputType>
		</RECORD>
		<RECORD>
			<Event>Open Map</Event>
			<Key>M</Key>
			<Ctrl>1</Ctrl>
			<Alt>0</Alt>
		</RECORD>
		<RECORD>
			<Event>Jump</Event>
			<Key>SPACE</Key>
		</RECORD>
		<RECORD>
			<Event>Open Map</Event>
			<Key>F9</Key>
			<Ctrl>0</Ctrl>
		</RECORD>
	</InputMappings>
</Config>
"#;

fn install(contents: &str) -> (TempDir, InstallationPath) {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("config.xml"), contents).unwrap();
    fs::write(tmp.path().join("WizardGraphicalClient.exe"), b"MZ").unwrap();
    let install = InstallationPath::validate(tmp.path()).unwrap();
    (tmp, install)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn loads_only_editable_records() {
    let (_tmp, install) = install(CONFIG);
    let config = ClientConfig::load(&install).unwrap();

    let events: Vec<_> = config.records().iter().map(|r| r.label()).collect();
    assert_eq!(events, vec!["Move Forward", "Open Map", "Open Map"]);
    assert_eq!(config.path(), install.config_file());
}

#[test]
fn toggling_shift_writes_one_and_keeps_key() {
    let (_tmp, install) = install(CONFIG);
    let mut config = ClientConfig::load(&install).unwrap();
    let mut session = EditSession::from_records(config.records());

    session.toggle_modifier("Move Forward", Modifier::Shift);
    let report = config.save(&session, ProtectionPolicy::Restore).unwrap();
    assert_eq!(report.records_updated, 2);

    let reloaded = ClientConfig::load(&install).unwrap();
    let record = reloaded.record("Move Forward").unwrap();
    assert_eq!(record.key(), "W");
    assert!(record.modifier(Modifier::Shift));
    assert!(read(&install.config_file()).contains("<Shift>1</Shift>"));
}

#[test]
fn saving_without_edits_keeps_the_file_byte_for_byte() {
    let (_tmp, install) = install(CONFIG);
    let mut config = ClientConfig::load(&install).unwrap();
    let session = EditSession::from_records(config.records());

    config.save(&session, ProtectionPolicy::Restore).unwrap();

    assert_eq!(read(&install.config_file()), CONFIG);
}

#[test]
fn two_saves_in_a_row_are_identical() {
    let (_tmp, install) = install(CONFIG);
    let mut config = ClientConfig::load(&install).unwrap();
    let mut session = EditSession::from_records(config.records());
    session.set_key("Open Map", "<Tab>");

    config.save(&session, ProtectionPolicy::Restore).unwrap();
    let first = read(&install.config_file());
    config.save(&session, ProtectionPolicy::Restore).unwrap();

    assert_eq!(read(&install.config_file()), first);
    assert!(first.contains("<Key>&lt;Tab&gt;</Key>"));
}

#[test]
fn duplicate_event_is_saved_onto_first_record_only() {
    let (_tmp, install) = install(CONFIG);
    let mut config = ClientConfig::load(&install).unwrap();
    let mut session = EditSession::from_records(config.records());
    assert_eq!(session.len(), 2);

    session.set_key("Open Map", "N");
    session.toggle_modifier("Open Map", Modifier::Alt);
    config.save(&session, ProtectionPolicy::Restore).unwrap();

    let text = read(&install.config_file());
    assert!(text.contains("<Key>N</Key>\n\t\t\t<Ctrl>1</Ctrl>\n\t\t\t<Alt>1</Alt>"));
    assert!(text.contains("<Key>F9</Key>\n\t\t\t<Ctrl>0</Ctrl>"));
}

#[test]
fn absent_fields_are_never_created() {
    let (_tmp, install) = install(
        "<Config><InputMappings><RECORD><Event>Quest</Event><Alt>0</Alt></RECORD></InputMappings></Config>",
    );
    let mut config = ClientConfig::load(&install).unwrap();
    let mut session = EditSession::from_records(config.records());

    session.set_key("Quest", "Q");
    session.toggle_modifier("Quest", Modifier::Ctrl);
    session.toggle_modifier("Quest", Modifier::Alt);
    config.save(&session, ProtectionPolicy::Restore).unwrap();

    assert_eq!(
        read(&install.config_file()),
        "<Config><InputMappings><RECORD><Event>Quest</Event><Alt>1</Alt></RECORD></InputMappings></Config>"
    );
}

#[test]
fn records_without_event_are_written_under_their_label() {
    let (_tmp, install) = install(
        "<Config><InputMappings><RECORD><Key>X</Key><Ctrl>0</Ctrl></RECORD></InputMappings></Config>",
    );
    let mut config = ClientConfig::load(&install).unwrap();
    let mut session = EditSession::from_records(config.records());
    assert!(config.record(UNKNOWN_EVENT).is_some());

    session.set_key(UNKNOWN_EVENT, "Y");
    session.toggle_modifier(UNKNOWN_EVENT, Modifier::Ctrl);
    let report = config.save(&session, ProtectionPolicy::Restore).unwrap();

    assert_eq!(report.records_updated, 1);
    assert_eq!(
        read(&install.config_file()),
        "<Config><InputMappings><RECORD><Key>Y</Key><Ctrl>1</Ctrl></RECORD></InputMappings></Config>"
    );
}

#[test]
fn read_only_file_is_cleared_for_the_write_and_restored() {
    let (_tmp, install) = install(CONFIG);
    let file = install.config_file();
    set_read_only(&file, true).unwrap();
    let mut config = ClientConfig::load(&install).unwrap();
    let mut session = EditSession::from_records(config.records());

    session.set_key("Move Forward", "UP");
    let report = config.save(&session, ProtectionPolicy::Restore).unwrap();

    assert!(report.read_only);
    assert!(is_read_only(&file).unwrap());
    assert!(read(&file).contains("<Key>UP</Key>"));
}

#[test]
fn writable_file_stays_writable_by_default() {
    let (_tmp, install) = install(CONFIG);
    let mut config = ClientConfig::load(&install).unwrap();
    let session = EditSession::from_records(config.records());

    let report = config.save(&session, ProtectionPolicy::Restore).unwrap();

    assert!(!report.read_only);
    assert!(!is_read_only(&install.config_file()).unwrap());
}

#[test]
fn lock_after_save_leaves_file_read_only() {
    let (_tmp, install) = install(CONFIG);
    let mut config = ClientConfig::load(&install).unwrap();
    let session = EditSession::from_records(config.records());

    let report = config.save(&session, ProtectionPolicy::LockAfterSave).unwrap();

    assert!(report.read_only);
    assert!(is_read_only(&install.config_file()).unwrap());
}

#[test]
fn failed_write_restores_protection_and_keeps_file() {
    let (tmp, install) = install(CONFIG);
    let file = install.config_file();
    // a directory in the way of the temporary file
    let blocker: PathBuf = tmp.path().join("config.xml.tmp");
    fs::create_dir(&blocker).unwrap();
    set_read_only(&file, true).unwrap();
    let mut config = ClientConfig::load(&install).unwrap();
    let mut session = EditSession::from_records(config.records());
    session.set_key("Move Forward", "UP");

    let err = config.save(&session, ProtectionPolicy::Restore).unwrap_err();

    assert!(matches!(err, SaveError::Io { .. }), "{err}");
    assert!(is_read_only(&file).unwrap());
    assert_eq!(read(&file), CONFIG);
    assert!(blocker.is_dir());

    // the editor can retry once the obstacle is gone
    fs::remove_dir(&blocker).unwrap();
    config.save(&session, ProtectionPolicy::Restore).unwrap();
    assert!(read(&file).contains("<Key>UP</Key>"));
    assert!(is_read_only(&file).unwrap());
}

#[test]
fn malformed_config_is_reported() {
    let (_tmp, install) = install("<Config><InputMappings></Config>");

    let err = ClientConfig::load(&install).unwrap_err();
    assert!(matches!(err, KeymapError::Malformed { .. }), "{err}");
}
