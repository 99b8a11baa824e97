use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keymap::{ClientConfig, EditEntry, EditSession, Modifier, ProtectionPolicy};
use ratatui::{backend::Backend, widgets::TableState, Terminal};
use tracing::info;
use tui_input::{backend::crossterm::EventHandler, Input};

use super::ui;
use crate::commands::{self, Command, CommandOutcome};
use crate::components::popups::{AlertPopup, ConfirmPopup};
use crate::components::{PopupComponent, PopupResult};

const PAGE: isize = 10;

/// Column with the focus inside the selected row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Key,
    Ctrl,
    Alt,
    Shift,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Key, Field::Ctrl, Field::Alt, Field::Shift];

    pub fn modifier(self) -> Option<Modifier> {
        match self {
            Field::Key => None,
            Field::Ctrl => Some(Modifier::Ctrl),
            Field::Alt => Some(Modifier::Alt),
            Field::Shift => Some(Modifier::Shift),
        }
    }

    fn next(self) -> Self {
        match self {
            Field::Key => Field::Ctrl,
            Field::Ctrl => Field::Alt,
            Field::Alt => Field::Shift,
            Field::Shift => Field::Key,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Key => Field::Shift,
            Field::Ctrl => Field::Key,
            Field::Alt => Field::Ctrl,
            Field::Shift => Field::Alt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Info,
    Success,
    Warning,
    Error,
}

/// One table row. Which fields exist is taken from the first record with
/// this event name, the same record a save writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRow {
    pub event: String,
    pub has_key: bool,
    pub modifiers: [bool; 3],
}

impl BindingRow {
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Key => self.has_key,
            Field::Ctrl => self.modifiers[0],
            Field::Alt => self.modifiers[1],
            Field::Shift => self.modifiers[2],
        }
    }
}

pub enum Overlay {
    Alert(AlertPopup),
    ConfirmQuit(ConfirmPopup),
}

impl Overlay {
    pub fn popup(&mut self) -> &mut dyn PopupComponent {
        match self {
            Overlay::Alert(p) => p,
            Overlay::ConfirmQuit(p) => p,
        }
    }
}

pub struct EditorApp {
    config: ClientConfig,
    session: EditSession,
    policy: ProtectionPolicy,

    pub rows: Vec<BindingRow>,
    pub table_state: TableState,
    pub field: Field,
    /// Key text being typed; `Some` while the inline editor is open.
    pub editing: Option<Input>,
    pub overlay: Option<Overlay>,

    pub status_message: Option<String>,
    pub status_type: StatusType,
    pub should_quit: bool,
}

impl EditorApp {
    pub fn new(config: ClientConfig, policy: ProtectionPolicy) -> Self {
        let session = EditSession::from_records(config.records());
        let rows: Vec<BindingRow> = session
            .iter()
            .map(|(event, _)| {
                let record = config.records().iter().find(|r| r.label() == event);
                BindingRow {
                    event: event.to_owned(),
                    has_key: record.is_some_and(|r| r.has_key_field()),
                    modifiers: Modifier::ALL.map(|m| record.is_some_and(|r| r.has_modifier(m))),
                }
            })
            .collect();

        let mut table_state = TableState::default();
        if !rows.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            config,
            session,
            policy,
            rows,
            table_state,
            field: Field::Key,
            editing: None,
            overlay: None,
            status_message: None,
            status_type: StatusType::Info,
            should_quit: false,
        }
    }

    pub fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        info!(bindings = self.rows.len(), "editor started");
        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(command) = self.on_key(key) {
                            self.dispatch(command);
                        }
                    }
                }
            }
            if self.should_quit {
                return Ok(());
            }
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn selected_row(&self) -> Option<&BindingRow> {
        self.rows.get(self.table_state.selected()?)
    }

    pub fn entry(&self, row: &BindingRow) -> Option<&EditEntry> {
        self.session.entry(&row.event)
    }

    /// Maps a key press to a command. Navigation, the inline editor and
    /// popups are handled here and yield `None`.
    pub fn on_key(&mut self, key: KeyEvent) -> Option<Command> {
        if let Some(overlay) = self.overlay.as_mut() {
            let result = overlay.popup().handle_key_events(key)?;
            let closed = self.overlay.take();
            return match (closed, result) {
                (Some(Overlay::ConfirmQuit(_)), PopupResult::Confirmed) => {
                    Some(Command::Quit { force: true })
                }
                _ => None,
            };
        }

        if let Some(input) = self.editing.as_mut() {
            match key.code {
                KeyCode::Enter => {
                    let input = self.editing.take()?;
                    let event = self.selected_row()?.event.clone();
                    return Some(Command::SetKey {
                        event,
                        key: input.value().to_owned(),
                    });
                }
                KeyCode::Esc => {
                    self.editing = None;
                    self.set_status(StatusType::Info, "Edit cancelled.");
                }
                _ => {
                    input.handle_event(&Event::Key(key));
                }
            }
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Command::Quit { force: false }),
            KeyCode::Char('s') => Some(Command::Save),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit { force: false }),
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                None
            }
            KeyCode::PageUp => {
                self.move_selection(-PAGE);
                None
            }
            KeyCode::PageDown => {
                self.move_selection(PAGE);
                None
            }
            KeyCode::Home => {
                self.move_selection(isize::MIN);
                None
            }
            KeyCode::End => {
                self.move_selection(isize::MAX);
                None
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.field = self.field.prev();
                None
            }
            KeyCode::Right | KeyCode::Tab => {
                self.field = self.field.next();
                None
            }
            KeyCode::Char('e') => {
                self.field = Field::Key;
                self.start_editing();
                None
            }
            KeyCode::Enter if self.field == Field::Key => {
                self.start_editing();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_focused(),
            _ => None,
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        let outcome = commands::execute(command, &mut self.session, &mut self.config, self.policy);
        self.apply_outcome(outcome);
    }

    fn apply_outcome(&mut self, outcome: CommandOutcome) {
        match outcome {
            CommandOutcome::Updated => {
                let pending = self.session.modified_count();
                self.set_status(
                    StatusType::Info,
                    format!("{pending} unsaved change(s). Press s to save."),
                );
            }
            CommandOutcome::Saved(report) => {
                let lock = if report.read_only { ", read-only" } else { "" };
                let message = format!(
                    "Saved {} binding(s) to {}{lock}",
                    report.records_updated,
                    self.config.path().display()
                );
                self.set_status(StatusType::Success, message);
                self.overlay = Some(Overlay::Alert(AlertPopup::new(
                    "Success",
                    "Changes saved successfully.",
                )));
            }
            CommandOutcome::SaveFailed(message) => {
                self.set_status(StatusType::Error, "Save failed, your edits are kept.");
                self.overlay = Some(Overlay::Alert(AlertPopup::new(
                    "Error",
                    format!("Error saving changes: {message}"),
                )));
            }
            CommandOutcome::Exit => self.should_quit = true,
            CommandOutcome::ConfirmExit => {
                let pending = self.session.modified_count();
                self.overlay = Some(Overlay::ConfirmQuit(
                    ConfirmPopup::new(
                        "Unsaved changes",
                        format!("{pending} binding(s) have unsaved changes.\nQuit without saving?"),
                    )
                    .ok_label("Quit")
                    .cancel_label("Stay")
                    .default_cancel(),
                ));
            }
            CommandOutcome::Ignored => {}
        }
    }

    fn set_status(&mut self, status_type: StatusType, message: impl Into<String>) {
        self.status_type = status_type;
        self.status_message = Some(message.into());
    }

    fn move_selection(&mut self, delta: isize) {
        let Some(last) = self.rows.len().checked_sub(1) else {
            return;
        };
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some(current.saturating_add_signed(delta).min(last)));
    }

    fn start_editing(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let (event, has_key) = (row.event.clone(), row.has_key);
        if !has_key {
            self.set_status(StatusType::Warning, format!("'{event}' has no Key field."));
            return;
        }
        let key = self
            .session
            .get(&event)
            .map(|state| state.key.clone())
            .unwrap_or_default();
        self.editing = Some(Input::new(key));
        self.set_status(
            StatusType::Info,
            format!("Editing the key of '{event}'. Enter to confirm, Esc to cancel."),
        );
    }

    fn toggle_focused(&mut self) -> Option<Command> {
        let modifier = self.field.modifier()?;
        let row = self.selected_row()?;
        if !row.has(self.field) {
            let message = format!("'{}' has no {modifier} field.", row.event);
            self.set_status(StatusType::Warning, message);
            return None;
        }
        Some(Command::ToggleModifier {
            event: row.event.clone(),
            modifier,
        })
    }
}
