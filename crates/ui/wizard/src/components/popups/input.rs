use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use tui_input::{backend::crossterm::EventHandler, Input};

use crate::tui::Frame;

use super::{centered_rect_fixed, draw_popup_frame, PopupComponent, PopupResult};

type Validator = Box<dyn Fn(&str) -> Result<(), String>>;

/// Single-line text prompt.
/// - Enter: validate, then `InputSubmitted(value)`
/// - Esc: `Cancelled`
/// - other keys edit the text
pub struct InputPopup {
    title: String,
    label: String,
    input: Input,
    error: Option<String>,
    validator: Option<Validator>,
    min_width: u16,
    min_height: u16,
}

impl InputPopup {
    pub fn new<T: Into<String>, L: Into<String>, V: Into<String>>(
        title: T,
        label: L,
        initial_value: V,
    ) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            input: Input::new(initial_value.into()),
            error: None,
            validator: None,
            min_width: 70,
            min_height: 9,
        }
    }

    pub fn validator(mut self, validator: impl Fn(&str) -> Result<(), String> + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn submit(&mut self) -> Option<PopupResult> {
        let checked = match &self.validator {
            Some(validate) => validate(self.input.value()),
            None => Ok(()),
        };
        match checked {
            Ok(()) => {
                self.error = None;
                Some(PopupResult::InputSubmitted(self.input.value().to_owned()))
            }
            Err(msg) => {
                self.error = Some(msg);
                None
            }
        }
    }
}

impl PopupComponent for InputPopup {
    fn handle_key_events(&mut self, key: KeyEvent) -> Option<PopupResult> {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => Some(PopupResult::Cancelled),
            _ => {
                if self.input.handle_event(&Event::Key(key)).is_some() {
                    self.error = None;
                }
                None
            }
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
        if area.width < 5 || area.height < 5 {
            return;
        }

        let w = self.min_width.min(area.width);
        let h = self.min_height.min(area.height);
        let inner = draw_popup_frame(f, centered_rect_fixed(area, w, h), &self.title);

        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(self.label.as_str(), Style::default().bold()),
                Span::raw(":"),
            ])),
            Rect { height: 1, ..inner },
        );

        let box_area = Rect {
            x: inner.x,
            y: inner.y.saturating_add(2).min(inner.bottom().saturating_sub(3)),
            width: inner.width,
            height: 3.min(inner.height),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let field = block.inner(box_area);
        f.render_widget(block, box_area);

        // long paths scroll so the cursor stays visible
        let scroll = self.input.visual_scroll(field.width.saturating_sub(1) as usize);
        f.render_widget(
            Paragraph::new(self.input.value()).scroll((0, scroll as u16)),
            field,
        );
        if field.width > 0 && field.height > 0 {
            let x = self.input.visual_cursor().max(scroll) - scroll;
            f.set_cursor_position((field.x + x as u16, field.y));
        }

        let below = box_area.bottom();
        if let Some(err) = &self.error {
            if below < inner.bottom() {
                f.render_widget(
                    Paragraph::new(Span::styled(err.as_str(), Style::default().fg(Color::Red))),
                    Rect {
                        y: below,
                        height: 1,
                        ..inner
                    },
                );
            }
        }

        let hints_y = inner.bottom().saturating_sub(1);
        if hints_y > below {
            let hints = Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::White)),
                Span::raw(": Submit   "),
                Span::styled("Esc", Style::default().fg(Color::White)),
                Span::raw(": Cancel"),
            ])
            .fg(Color::DarkGray);
            f.render_widget(
                Paragraph::new(hints),
                Rect {
                    y: hints_y,
                    height: 1,
                    ..inner
                },
            );
        }
    }
}
