use keymap::Modifier as KeyModifier;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Row, Table},
    Frame,
};

use super::super::colors::{
    c_accent, c_accent2, c_bg_panel, c_bg_selected, c_text, c_text_dim, c_warn,
};
use super::utils::truncate_text;
use crate::editor::app::{BindingRow, EditorApp, Field};

pub(in crate::editor::ui) fn draw_records_panel(f: &mut Frame, app: &mut EditorApp, area: Rect) {
    let path = app.config().path().display().to_string();
    let title = format!(
        " Keybindings: {} ",
        truncate_text(&path, area.width.saturating_sub(20) as usize)
    );
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(c_accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(c_accent()))
        .style(Style::default().bg(c_bg_panel()));

    let header = Row::new(["", "Event", "Key", "Ctrl", "Alt", "Shift"]).style(
        Style::default()
            .fg(c_accent2())
            .add_modifier(Modifier::BOLD),
    );

    let view: &EditorApp = app;
    let selected = view.table_state.selected();
    let rows: Vec<Row> = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| binding_row(view, row, (selected == Some(i)).then_some(view.field)))
        .collect();

    let widths = [
        Constraint::Length(1),
        Constraint::Min(24),
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(c_bg_selected()))
        .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

/// `focus` is the focused column when this is the selected row.
fn binding_row(app: &EditorApp, row: &BindingRow, focus: Option<Field>) -> Row<'static> {
    let entry = app.entry(row);
    let modified = entry.is_some_and(|e| e.is_modified());
    let state = entry.map(|e| e.current());

    let dim = Style::default().fg(c_text_dim());
    let focused = |field: Field, style: Style| {
        if focus == Some(field) {
            style
                .fg(c_bg_panel())
                .bg(c_accent())
                .add_modifier(Modifier::BOLD)
        } else {
            style
        }
    };

    let key_cell = if row.has_key {
        let key = state.map(|s| s.key.clone()).unwrap_or_default();
        if key.is_empty() {
            Cell::from("(empty)").style(focused(Field::Key, dim))
        } else {
            Cell::from(key).style(focused(Field::Key, Style::default().fg(c_text())))
        }
    } else {
        Cell::from("-").style(focused(Field::Key, dim))
    };

    let mut cells = vec![
        Cell::from(if modified { "*" } else { " " }).style(Style::default().fg(c_warn())),
        Cell::from(row.event.clone()).style(Style::default().fg(c_text())),
        key_cell,
    ];
    for (field, m) in [
        (Field::Ctrl, KeyModifier::Ctrl),
        (Field::Alt, KeyModifier::Alt),
        (Field::Shift, KeyModifier::Shift),
    ] {
        let cell = if row.has(field) {
            let on = state.is_some_and(|s| s.modifier(m));
            let style = if on {
                Style::default().fg(c_accent2())
            } else {
                Style::default().fg(c_text())
            };
            Cell::from(format!("[{}] {m}", if on { "x" } else { " " })).style(focused(field, style))
        } else {
            Cell::from("-").style(focused(field, dim))
        };
        cells.push(cell);
    }

    Row::new(cells)
}
