use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::super::colors::{
    c_accent, c_bg_panel, c_border, c_err, c_ok, c_text, c_text_dim, c_warn,
};
use crate::editor::app::{EditorApp, StatusType};

pub(in crate::editor::ui) fn draw_status_bar(f: &mut Frame, app: &EditorApp, area: Rect) {
    let status_block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(c_border()))
        .style(Style::default().bg(c_bg_panel()));
    let inner = status_block.inner(area);
    f.render_widget(status_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    let (message, message_style) = status_message_and_style(app);
    let status_paragraph = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(message, message_style),
    ]))
    .style(Style::default().bg(c_bg_panel()))
    .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, chunks[0]);

    let hints_paragraph = Paragraph::new(Line::from(key_hints(app)))
        .style(Style::default().bg(c_bg_panel()).fg(c_border()))
        .alignment(Alignment::Right);
    f.render_widget(hints_paragraph, chunks[1]);
}

fn status_message_and_style(app: &EditorApp) -> (String, Style) {
    if let Some(message) = &app.status_message {
        let style = match app.status_type {
            StatusType::Success => Style::default().fg(c_ok()).add_modifier(Modifier::BOLD),
            StatusType::Warning => Style::default().fg(c_warn()).add_modifier(Modifier::BOLD),
            StatusType::Error => Style::default().fg(c_err()).add_modifier(Modifier::BOLD),
            StatusType::Info => Style::default().fg(c_accent()),
        };
        return (message.clone(), style);
    }

    let pending = app.session().modified_count();
    let message = if pending == 0 {
        format!("{} bindings. Close Wizard101 before saving.", app.rows.len())
    } else {
        format!("{pending} unsaved change(s). Close Wizard101 before saving.")
    };
    (message, Style::default().fg(c_text_dim()))
}

fn key_hints(app: &EditorApp) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    let add_hint = |spans: &mut Vec<Span<'static>>,
                    key: &'static str,
                    action: &'static str,
                    emphasized: bool| {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        let key_style = if emphasized {
            Style::default().fg(c_accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(c_text()).add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(format!("[{key}]"), key_style));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(c_text_dim()),
        ));
    };

    if app.editing.is_some() {
        add_hint(&mut spans, "Enter", "Confirm", true);
        add_hint(&mut spans, "Esc", "Cancel", false);
    } else {
        add_hint(&mut spans, "↑↓", "Move", false);
        add_hint(&mut spans, "←→", "Field", false);
        add_hint(&mut spans, "Space", "Toggle", false);
        add_hint(&mut spans, "e", "Edit", false);
        add_hint(&mut spans, "s", "Save", true);
        add_hint(&mut spans, "q", "Quit", false);
    }

    spans.push(Span::raw(" "));
    spans
}
