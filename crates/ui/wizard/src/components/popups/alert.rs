use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::tui::Frame;

use super::{centered_rect_fixed, draw_popup_frame, PopupComponent, PopupResult};

/// Which keys close an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismiss {
    /// Enter or Esc.
    Confirm,
    AnyKey,
    /// A notice shown while the program is busy; it is replaced, not closed.
    Never,
}

/// Modal message with a title. Always closes with `PopupResult::Confirmed`.
pub struct AlertPopup {
    title: String,
    message: String,
    dismiss: Dismiss,
    min_width: u16,
    min_height: u16,
}

impl AlertPopup {
    pub fn new<T: Into<String>, M: Into<String>>(title: T, message: M) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            dismiss: Dismiss::Confirm,
            min_width: 60,
            min_height: 7,
        }
    }

    pub fn dismiss(mut self, dismiss: Dismiss) -> Self {
        self.dismiss = dismiss;
        self
    }

    pub fn min_width(mut self, w: u16) -> Self {
        self.min_width = w.max(20);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn hint(&self) -> Option<Line<'static>> {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::White));
        let line = match self.dismiss {
            Dismiss::Confirm => Line::from(vec![
                key("Enter"),
                Span::raw(": OK   "),
                key("Esc"),
                Span::raw(": Close"),
            ]),
            Dismiss::AnyKey => Line::from(key("Press any key")),
            Dismiss::Never => return None,
        };
        Some(line.fg(Color::DarkGray))
    }
}

impl PopupComponent for AlertPopup {
    fn handle_key_events(&mut self, key: KeyEvent) -> Option<PopupResult> {
        match (self.dismiss, key.code) {
            (Dismiss::AnyKey, _) | (Dismiss::Confirm, KeyCode::Enter | KeyCode::Esc) => {
                Some(PopupResult::Confirmed)
            }
            _ => None,
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
        if area.width < 5 || area.height < 5 {
            return;
        }

        let lines = self.message.lines().count() as u16;
        let h = self.min_height.max(lines + 4).min(area.height);
        let dialog = centered_rect_fixed(area, self.min_width.min(area.width), h);
        let inner = draw_popup_frame(f, dialog, &self.title);

        let mut text: Vec<Line> = self.message.lines().map(Line::raw).collect();
        if let Some(hint) = self.hint() {
            if inner.height >= 3 {
                text.push(Line::raw(""));
            }
            text.push(hint);
        }

        f.render_widget(
            Paragraph::new(Text::from(text)).wrap(Wrap { trim: true }),
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
    fn confirm_alert_ignores_other_keys() {
        let mut alert = AlertPopup::new("Success", "Changes saved successfully.");

        assert_eq!(alert.handle_key_events(key(KeyCode::Char('x'))), None);
        assert_eq!(
            alert.handle_key_events(key(KeyCode::Esc)),
            Some(PopupResult::Confirmed)
        );
    }

    #[test]
    fn any_key_and_never() {
        let mut ack = AlertPopup::new("Search", "Path found.").dismiss(Dismiss::AnyKey);
        let mut notice = AlertPopup::new("Search", "Searching.").dismiss(Dismiss::Never);

        assert_eq!(
            ack.handle_key_events(key(KeyCode::Char('x'))),
            Some(PopupResult::Confirmed)
        );
        assert_eq!(notice.handle_key_events(key(KeyCode::Enter)), None);
    }
}
