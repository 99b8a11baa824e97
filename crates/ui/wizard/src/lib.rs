//! `w101-keys`: a terminal editor for the keybindings in the Wizard101
//! client's `config.xml`.

pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod editor;
pub mod errors;
pub mod prompts;
pub mod tui;

pub struct KeysApp;

impl app::Application for KeysApp {
    const APP_ID: &'static str = "w101-keys";
}
