//! The keybinding table: one row per event, a key column and three
//! modifier toggles.

mod app;
mod ui;

pub use app::{BindingRow, EditorApp, Field, Overlay, StatusType};
