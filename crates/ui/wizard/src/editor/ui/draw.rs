mod header;
mod key_input;
mod records_panel;
mod status_bar;
mod utils;

pub(super) use header::draw_header;
pub(super) use key_input::draw_key_input;
pub(super) use records_panel::draw_records_panel;
pub(super) use status_bar::draw_status_bar;
