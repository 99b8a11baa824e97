//! Keybindings of the Wizard101 client.
//!
//! The crate reads `config.xml` into a lossless tree, picks out the
//! `InputMappings/RECORD` entries that carry modifier keys, keeps per-event
//! edit buffers, and writes those buffers back into the file.
//!
//! # Example
//!
//! ```ignore
//! use keymap::{ClientConfig, EditSession, Modifier, ProtectionPolicy};
//!
//! let mut config = ClientConfig::open("config.xml")?;
//! let mut session = EditSession::from_records(config.records());
//! session.toggle_modifier("Move Forward", Modifier::Shift);
//! config.save(&session, ProtectionPolicy::Restore)?;
//! ```

pub mod client;
pub mod errors;
pub mod record;
pub mod session;
pub mod writer;
pub mod xml;

// Re-export main types
pub use client::ClientConfig;
pub use errors::{KeymapError, SaveError, XmlError};
pub use record::{collect_records, InputRecord, Modifier, UNKNOWN_EVENT};
pub use session::{EditEntry, EditSession, EditState};
pub use writer::{is_read_only, set_read_only, ProtectionPolicy, SaveReport};
pub use xml::XmlDocument;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
