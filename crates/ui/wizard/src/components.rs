//! Widgets shared by the startup prompts and the editor.

pub mod popup;
pub mod popups;

pub use popup::{
    centered_rect_fixed, draw_popup_frame, render_backdrop, PopupComponent, PopupResult,
};
