use std::fs;

use keymap::{
    set_read_only, ClientConfig, EditSession, Modifier, ProtectionPolicy, UNKNOWN_EVENT,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use w101_keys::commands::{execute, Command, CommandOutcome};

const CONFIG: &str = "<Config>
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
  </InputMappings>
</Config>
";

fn load() -> (TempDir, ClientConfig, EditSession) {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("config.xml");
    fs::write(&file, CONFIG).unwrap();
    let config = ClientConfig::open(&file).unwrap();
    let session = EditSession::from_records(config.records());
    (tmp, config, session)
}

fn run(
    config: &mut ClientConfig,
    session: &mut EditSession,
    command: Command,
) -> CommandOutcome {
    execute(command, session, config, ProtectionPolicy::Restore)
}

#[test]
fn toggle_then_save_writes_the_flag() {
    let (_tmp, mut config, mut session) = load();

    let outcome = run(
        &mut config,
        &mut session,
        Command::ToggleModifier {
            event: "Move Forward".into(),
            modifier: Modifier::Shift,
        },
    );
    assert_eq!(outcome, CommandOutcome::Updated);

    let CommandOutcome::Saved(report) = run(&mut config, &mut session, Command::Save) else {
        panic!("save failed");
    };
    assert_eq!(report.records_updated, 1);
    assert!(!session.has_unsaved_changes());

    let text = fs::read_to_string(config.path()).unwrap();
    assert!(text.contains("<Key>W</Key>\n      <Shift>1</Shift>"));
    assert!(text.contains("<Ctrl>1</Ctrl>\n      <InputType>Mouse</InputType>"));
}

#[test]
fn unknown_events_are_ignored() {
    let (_tmp, mut config, mut session) = load();

    let outcome = run(
        &mut config,
        &mut session,
        Command::SetKey {
            event: "Select Target".into(),
            key: "X".into(),
        },
    );

    assert_eq!(outcome, CommandOutcome::Ignored);
    assert!(!session.has_unsaved_changes());
}

#[test]
fn quitting_with_edits_asks_first() {
    let (_tmp, mut config, mut session) = load();
    assert_eq!(
        run(&mut config, &mut session, Command::Quit { force: false }),
        CommandOutcome::Exit
    );

    run(
        &mut config,
        &mut session,
        Command::SetKey {
            event: "Move Forward".into(),
            key: "UP".into(),
        },
    );

    assert_eq!(
        run(&mut config, &mut session, Command::Quit { force: false }),
        CommandOutcome::ConfirmExit
    );
    assert_eq!(
        run(&mut config, &mut session, Command::Quit { force: true }),
        CommandOutcome::Exit
    );
}

#[test]
fn failed_save_keeps_the_edits_for_a_retry() {
    let (tmp, mut config, mut session) = load();
    let blocker = tmp.path().join("config.xml.tmp");
    fs::create_dir(&blocker).unwrap();
    set_read_only(config.path(), true).unwrap();

    session.set_key("Move Forward", "UP");
    let outcome = run(&mut config, &mut session, Command::Save);

    let CommandOutcome::SaveFailed(message) = outcome else {
        panic!("expected a failure, got {outcome:?}");
    };
    assert!(message.contains("config.xml"), "{message}");
    assert!(session.has_unsaved_changes());
    assert_eq!(fs::read_to_string(config.path()).unwrap(), CONFIG);

    fs::remove_dir(&blocker).unwrap();
    assert!(matches!(
        run(&mut config, &mut session, Command::Save),
        CommandOutcome::Saved(_)
    ));
    assert!(fs::read_to_string(config.path()).unwrap().contains("<Key>UP</Key>"));
}

#[test]
fn edits_to_a_record_without_event_reach_the_file() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("config.xml");
    fs::write(
        &file,
        "<Config><InputMappings><RECORD><Key>X</Key><Ctrl>0</Ctrl></RECORD></InputMappings></Config>",
    )
    .unwrap();
    let mut config = ClientConfig::open(&file).unwrap();
    let mut session = EditSession::from_records(config.records());

    for command in [
        Command::ToggleModifier {
            event: UNKNOWN_EVENT.into(),
            modifier: Modifier::Ctrl,
        },
        Command::SetKey {
            event: UNKNOWN_EVENT.into(),
            key: "Y".into(),
        },
    ] {
        assert_eq!(
            run(&mut config, &mut session, command),
            CommandOutcome::Updated
        );
    }

    let CommandOutcome::Saved(report) = run(&mut config, &mut session, Command::Save) else {
        panic!("save failed");
    };
    assert_eq!(report.records_updated, 1);
    assert!(!session.has_unsaved_changes());
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "<Config><InputMappings><RECORD><Key>Y</Key><Ctrl>1</Ctrl></RECORD></InputMappings></Config>"
    );
}
