use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use super::app::EditorApp;
use crate::components::render_backdrop;

mod colors;
mod draw;

use colors::c_bg;
use draw::{draw_header, draw_key_input, draw_records_panel, draw_status_bar};

pub(super) fn draw(f: &mut Frame, app: &mut EditorApp) {
    let size = f.area();
    f.render_widget(Block::default().style(Style::default().bg(c_bg())), size);

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Table
            Constraint::Length(2), // Status bar
        ])
        .split(size);

    draw_header(f, root[0]);
    if app.editing.is_some() {
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(root[1]);
        draw_records_panel(f, app, body[0]);
        draw_key_input(f, app, body[1]);
    } else {
        draw_records_panel(f, app, root[1]);
    }
    draw_status_bar(f, app, root[2]);

    if let Some(overlay) = app.overlay.as_mut() {
        render_backdrop(f, size);
        overlay.popup().draw(f, size);
    }
}
