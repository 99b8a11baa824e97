//! Terminal side of installation lookup: the questions and notices the
//! resolver needs, shown as popups over an otherwise empty screen.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use locator::Prompter;
use tracing::debug;

use crate::components::popups::{AlertPopup, ConfirmPopup, Dismiss, InputPopup};
use crate::components::{render_backdrop, PopupComponent, PopupResult};
use crate::tui::Tui;

pub const DIALOG_TITLE: &str = "Wizard101 Config Editor";

/// Shows each resolver step as a modal popup. The terminal is only switched
/// to the alternate screen once the first popup is needed.
pub struct TerminalPrompter<'a> {
    tui: &'a mut Tui,
    tick_rate: Duration,
}

impl<'a> TerminalPrompter<'a> {
    pub fn new(tui: &'a mut Tui, tick_rate: Duration) -> Self {
        Self { tui, tick_rate }
    }

    fn show(&mut self, popup: &mut dyn PopupComponent) -> io::Result<()> {
        self.tui.enter()?;
        self.tui.draw(|f| {
            let area = f.area();
            render_backdrop(f, area);
            popup.draw(f, area);
        })?;
        Ok(())
    }

    /// Redraws `popup` until it produces a result.
    fn run_modal(&mut self, popup: &mut dyn PopupComponent) -> io::Result<PopupResult> {
        loop {
            self.show(popup)?;
            if !event::poll(self.tick_rate)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(result) = modal_key(popup, key)? {
                return Ok(result);
            }
        }
    }
}

/// Routes one key press to `popup`. Ctrl+C aborts the whole lookup instead
/// of answering the question, so declining can never start a drive scan.
fn modal_key(popup: &mut dyn PopupComponent, key: KeyEvent) -> io::Result<Option<PopupResult>> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        debug!("lookup interrupted");
        return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled with Ctrl+C"));
    }
    Ok(popup.handle_key_events(key))
}

impl Prompter for TerminalPrompter<'_> {
    fn confirm_manual_selection(&mut self) -> io::Result<bool> {
        let mut popup = ConfirmPopup::new(
            DIALOG_TITLE,
            "Would you like to manually select the Wizard101 folder?\n\
             Choosing No searches the whole drive instead.",
        )
        .ok_label("Yes")
        .cancel_label("No");
        let result = self.run_modal(&mut popup)?;
        Ok(result == PopupResult::Confirmed)
    }

    fn pick_directory(&mut self) -> io::Result<Option<PathBuf>> {
        let mut popup = InputPopup::new(
            "Select Wizard101 folder",
            "Folder with config.xml and WizardGraphicalClient.exe",
            "",
        )
        .validator(|value| {
            if clean_path_input(value).is_empty() {
                Err("Enter a folder path or press Esc to cancel.".into())
            } else {
                Ok(())
            }
        });
        match self.run_modal(&mut popup)? {
            PopupResult::InputSubmitted(value) => {
                let dir = PathBuf::from(clean_path_input(&value));
                debug!(dir = %dir.display(), "folder picked");
                Ok(Some(dir))
            }
            _ => Ok(None),
        }
    }

    fn scan_started(&mut self, root: &Path) -> io::Result<()> {
        let mut notice = AlertPopup::new(
            DIALOG_TITLE,
            format!("Searching. Please wait...\n\nScanning {}", root.display()),
        )
        .dismiss(Dismiss::Never);
        self.show(&mut notice)
    }

    fn scan_finished(&mut self, found: Option<&Path>) -> io::Result<()> {
        let message = match found {
            Some(dir) => format!(
                "Path found. Press any key to continue.\n\n{}",
                dir.display()
            ),
            None => "Search finished. Press any key to continue.".to_owned(),
        };
        let mut popup = AlertPopup::new(DIALOG_TITLE, message).dismiss(Dismiss::AnyKey);
        // keys typed during the scan would dismiss the popup unseen
        while event::poll(Duration::ZERO)? {
            event::read()?;
        }
        self.run_modal(&mut popup).map(drop)
    }

    fn report_not_found(&mut self) -> io::Result<()> {
        let mut popup = AlertPopup::new("File Not Found", "Wizard101 config.xml not found.");
        self.run_modal(&mut popup).map(drop)
    }
}

/// Trims whitespace and one pair of surrounding quotes, as left behind by
/// pasting a path copied from Explorer.
pub fn clean_path_input(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_interrupts_instead_of_declining() {
        let mut popup = ConfirmPopup::new(DIALOG_TITLE, "Select the folder?");

        let err = modal_key(
            &mut popup,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);

        // Esc still answers No
        let answer = modal_key(&mut popup, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(answer.unwrap(), Some(PopupResult::Cancelled));
    }

    #[test]
    fn pasted_paths_are_cleaned() {
        assert_eq!(
            clean_path_input("  \"C:\\Games\\Wizard101\\Bin\"  "),
            "C:\\Games\\Wizard101\\Bin"
        );
        assert_eq!(clean_path_input("'/srv/w101'"), "/srv/w101");
        assert_eq!(clean_path_input("\"half"), "\"half");
        assert_eq!(clean_path_input("   "), "");
    }
}
