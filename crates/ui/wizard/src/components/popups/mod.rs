//! Concrete dialogs. The shared trait and drawing helpers live in
//! `components/popup.rs`.

pub mod alert;
pub mod confirm;
pub mod input;

pub use alert::{AlertPopup, Dismiss};
pub use confirm::ConfirmPopup;
pub use input::InputPopup;

pub use crate::components::popup::{
    centered_rect_fixed, draw_popup_frame, render_backdrop, PopupComponent, PopupResult,
};
