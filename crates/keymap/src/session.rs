//! Editable buffers for the records of one run.

use indexmap::IndexMap;

use crate::record::{InputRecord, Modifier};

/// Mutable copy of one record's key text and modifier toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl EditState {
    pub fn from_record(record: &InputRecord) -> Self {
        Self {
            key: record.key().to_owned(),
            ctrl: record.modifier(Modifier::Ctrl),
            alt: record.modifier(Modifier::Alt),
            shift: record.modifier(Modifier::Shift),
        }
    }

    pub fn modifier(&self, m: Modifier) -> bool {
        match m {
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Shift => self.shift,
        }
    }

    pub fn set_modifier(&mut self, m: Modifier, on: bool) {
        match m {
            Modifier::Ctrl => self.ctrl = on,
            Modifier::Alt => self.alt = on,
            Modifier::Shift => self.shift = on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEntry {
    original: EditState,
    current: EditState,
}

impl EditEntry {
    pub fn original(&self) -> &EditState {
        &self.original
    }

    pub fn current(&self) -> &EditState {
        &self.current
    }

    pub fn is_modified(&self) -> bool {
        self.original != self.current
    }
}

/// Event name to edit buffer, in document order. A name that occurs more
/// than once gets a single entry seeded from its first record.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    entries: IndexMap<String, EditEntry>,
}

impl EditSession {
    pub fn from_records(records: &[InputRecord]) -> Self {
        let mut entries = IndexMap::with_capacity(records.len());
        for record in records {
            entries
                .entry(record.label().to_owned())
                .or_insert_with(|| {
                    let state = EditState::from_record(record);
                    EditEntry {
                        original: state.clone(),
                        current: state,
                    }
                });
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, event: &str) -> Option<&EditState> {
        self.entries.get(event).map(EditEntry::current)
    }

    pub fn entry(&self, event: &str) -> Option<&EditEntry> {
        self.entries.get(event)
    }

    /// Current buffers in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EditState)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.current))
    }

    /// Returns `false` when no record has this event name.
    pub fn set_key(&mut self, event: &str, key: impl Into<String>) -> bool {
        match self.entries.get_mut(event) {
            Some(entry) => {
                entry.current.key = key.into();
                true
            }
            None => false,
        }
    }

    /// Flips one toggle and returns its new state.
    pub fn toggle_modifier(&mut self, event: &str, m: Modifier) -> Option<bool> {
        let state = &mut self.entries.get_mut(event)?.current;
        let on = !state.modifier(m);
        state.set_modifier(m, on);
        Some(on)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.entries.values().any(EditEntry::is_modified)
    }

    pub fn modified_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_modified()).count()
    }

    /// Makes the current buffers the new baseline after a successful save.
    pub fn mark_saved(&mut self) {
        for entry in self.entries.values_mut() {
            entry.original = entry.current.clone();
        }
    }
}
