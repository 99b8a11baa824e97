use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::super::colors::{c_accent2, c_bg_panel, c_text};
use crate::editor::app::EditorApp;

/// The inline key editor below the table.
pub(in crate::editor::ui) fn draw_key_input(f: &mut Frame, app: &EditorApp, area: Rect) {
    let Some(input) = &app.editing else {
        return;
    };
    let event = app.selected_row().map(|r| r.event.as_str()).unwrap_or_default();

    let block = Block::default()
        .title(Span::styled(
            format!(" Key for {event} "),
            Style::default().fg(c_accent2()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(c_accent2()))
        .style(Style::default().bg(c_bg_panel()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // one column stays free for the cursor after the last character
    let scroll = input.visual_scroll(inner.width.saturating_sub(1) as usize);
    f.render_widget(
        Paragraph::new(input.value())
            .scroll((0, scroll as u16))
            .style(Style::default().fg(c_text())),
        inner,
    );
    if inner.width > 0 && inner.height > 0 {
        let x = input.visual_cursor().max(scroll) - scroll;
        f.set_cursor_position((inner.x + x as u16, inner.y));
    }
}
