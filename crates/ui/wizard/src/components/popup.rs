use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Block, Borders, Clear},
};

use crate::tui::Frame;

/// How a modal dialog was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupResult {
    Confirmed,
    Cancelled,
    InputSubmitted(String),
}

/// A modal dialog drawn over whatever is on screen.
///
/// Usage:
/// 1) Draw the page as usual
/// 2) If a popup is open, call `render_backdrop(frame, area)` and then the
///    popup's `draw` with the same area
/// 3) Feed key presses to `handle_key_events` until it returns a result
pub trait PopupComponent {
    /// `Some` once the dialog is done; the caller closes it.
    fn handle_key_events(&mut self, key: KeyEvent) -> Option<PopupResult>;

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect);
}

/// Terminals have no transparency, so the page behind a popup is blanked
/// with a dark background.
pub fn render_backdrop(frame: &mut Frame<'_>, area: Rect) {
    let backdrop = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(backdrop, area);
}

/// A `width` x `height` rectangle centered in `area`, clamped to it.
pub fn centered_rect_fixed(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);

    Rect {
        x: area.x.saturating_add(area.width.saturating_sub(w) / 2),
        y: area.y.saturating_add(area.height.saturating_sub(h) / 2),
        width: w,
        height: h,
    }
}

/// Clears `area` and draws the rounded dialog border with `title`. Returns
/// the inner area.
pub fn draw_popup_frame(frame: &mut Frame<'_>, area: Rect, title: impl Into<String>) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", title.into()))
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .style(Style::default().fg(Color::White).bg(Color::Black));
    let inner = block.inner(area);

    frame.render_widget(block, area);
    inner
}
