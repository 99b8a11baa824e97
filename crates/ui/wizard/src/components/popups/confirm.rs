use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::tui::Frame;

use super::{centered_rect_fixed, draw_popup_frame, PopupComponent, PopupResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Ok,
    Cancel,
}

/// Question with two buttons.
///
/// - Left/Right, Tab/BackTab: switch button
/// - Enter: `Confirmed` or `Cancelled` depending on the selection
/// - `y` / `n`: pick directly
/// - Esc: `Cancelled`
pub struct ConfirmPopup {
    title: String,
    question: String,
    ok_label: String,
    cancel_label: String,
    selected: Choice,
    min_width: u16,
    min_height: u16,
}

impl ConfirmPopup {
    pub fn new<T: Into<String>, Q: Into<String>>(title: T, question: Q) -> Self {
        Self {
            title: title.into(),
            question: question.into(),
            ok_label: "OK".into(),
            cancel_label: "Cancel".into(),
            selected: Choice::Ok,
            min_width: 60,
            min_height: 9,
        }
    }

    pub fn ok_label<S: Into<String>>(mut self, label: S) -> Self {
        self.ok_label = label.into();
        self
    }

    pub fn cancel_label<S: Into<String>>(mut self, label: S) -> Self {
        self.cancel_label = label.into();
        self
    }

    /// Preselects the cancel button.
    pub fn default_cancel(mut self) -> Self {
        self.selected = Choice::Cancel;
        self
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    fn result(&self) -> PopupResult {
        match self.selected {
            Choice::Ok => PopupResult::Confirmed,
            Choice::Cancel => PopupResult::Cancelled,
        }
    }

    fn toggle_selection(&mut self) {
        self.selected = match self.selected {
            Choice::Ok => Choice::Cancel,
            Choice::Cancel => Choice::Ok,
        };
    }

    fn button(&self, label: &str, choice: Choice) -> Span<'static> {
        let style = if self.selected == choice {
            Style::default().fg(Color::Black).bg(Color::White).bold()
        } else {
            Style::default().fg(Color::White).bg(Color::Black)
        };
        Span::styled(format!("[ {label} ]"), style)
    }
}

impl PopupComponent for ConfirmPopup {
    fn handle_key_events(&mut self, key: KeyEvent) -> Option<PopupResult> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_selection();
                None
            }
            KeyCode::Enter => Some(self.result()),
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(PopupResult::Confirmed),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Some(PopupResult::Cancelled)
            }
            _ => None,
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
        if area.width < 5 || area.height < 5 {
            return;
        }

        let w = self.min_width.min(area.width);
        let h = self.min_height.min(area.height);
        let inner = draw_popup_frame(f, centered_rect_fixed(area, w, h), &self.title);

        let mut lines: Vec<Line> = self.question.lines().map(Line::raw).collect();
        if inner.height >= 3 {
            lines.push(Line::raw(""));
        }

        // buttons, centered by padding
        let spacing = "   ";
        let buttons_len = self.ok_label.chars().count()
            + self.cancel_label.chars().count()
            + 8
            + spacing.len();
        let pad = (inner.width as usize).saturating_sub(buttons_len) / 2;
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(pad)),
            self.button(&self.ok_label, Choice::Ok),
            Span::raw(spacing),
            self.button(&self.cancel_label, Choice::Cancel),
        ]));

        if inner.height >= 5 {
            lines.push(Line::raw(""));
            lines.push(
                Line::from(vec![
                    Span::styled("←/→/Tab", Style::default().fg(Color::White)),
                    Span::raw(": Select   "),
                    Span::styled("Enter", Style::default().fg(Color::White)),
                    Span::raw(": Confirm   "),
                    Span::styled("Esc", Style::default().fg(Color::White)),
                    Span::raw(": Cancel"),
                ])
                .fg(Color::DarkGray),
            );
        }

        f.render_widget(
            Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_follows_the_selection() {
        let mut popup = ConfirmPopup::new("Wizard101 Config Editor", "Scan?");
        assert_eq!(popup.handle_key_events(key(KeyCode::Tab)), None);
        assert_eq!(
            popup.handle_key_events(key(KeyCode::Enter)),
            Some(PopupResult::Cancelled)
        );

        let mut popup = ConfirmPopup::new("Quit", "Discard?").default_cancel();
        popup.handle_key_events(key(KeyCode::Left));
        assert_eq!(
            popup.handle_key_events(key(KeyCode::Enter)),
            Some(PopupResult::Confirmed)
        );
    }

    #[test]
    fn shortcuts_and_escape() {
        let mut popup = ConfirmPopup::new("t", "q");

        assert_eq!(
            popup.handle_key_events(key(KeyCode::Char('y'))),
            Some(PopupResult::Confirmed)
        );
        assert_eq!(
            popup.handle_key_events(key(KeyCode::Esc)),
            Some(PopupResult::Cancelled)
        );
        assert_eq!(popup.handle_key_events(key(KeyCode::Char('x'))), None);
    }
}
