//! Editor actions as values, so they can be run without a terminal.

use keymap::{ClientConfig, EditSession, Modifier, ProtectionPolicy, SaveReport};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetKey { event: String, key: String },
    ToggleModifier { event: String, modifier: Modifier },
    Save,
    /// `force` skips the unsaved-changes check.
    Quit { force: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Updated,
    Saved(SaveReport),
    /// The save error's message; the session keeps its edits.
    SaveFailed(String),
    Exit,
    /// Quitting would drop unsaved edits.
    ConfirmExit,
    /// The event is not in the session.
    Ignored,
}

pub fn execute(
    command: Command,
    session: &mut EditSession,
    config: &mut ClientConfig,
    policy: ProtectionPolicy,
) -> CommandOutcome {
    debug!(?command, "executing");
    match command {
        Command::SetKey { event, key } => {
            if session.set_key(&event, key) {
                CommandOutcome::Updated
            } else {
                CommandOutcome::Ignored
            }
        }
        Command::ToggleModifier { event, modifier } => {
            match session.toggle_modifier(&event, modifier) {
                Some(_) => CommandOutcome::Updated,
                None => CommandOutcome::Ignored,
            }
        }
        Command::Save => match config.save(session, policy) {
            Ok(report) => {
                session.mark_saved();
                CommandOutcome::Saved(report)
            }
            Err(e) => {
                error!(path = %config.path().display(), error = %e, "save failed");
                CommandOutcome::SaveFailed(e.to_string())
            }
        },
        Command::Quit { force } => {
            if !force && session.has_unsaved_changes() {
                CommandOutcome::ConfirmExit
            } else {
                CommandOutcome::Exit
            }
        }
    }
}
