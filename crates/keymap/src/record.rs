//! Keybinding records as they appear under `InputMappings`.

use std::fmt;

use crate::xml::{Element, NodePath, XmlDocument};

pub const INPUT_MAPPINGS: &str = "InputMappings";
pub const RECORD: &str = "RECORD";

/// Label used for records without an `Event`.
pub const UNKNOWN_EVENT: &str = "Unknown Event";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
}

impl Modifier {
    pub const ALL: [Modifier; 3] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift];

    /// Element name inside a `RECORD`.
    pub fn tag(self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Snapshot of one `RECORD` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    handle: NodePath,
    event: Option<String>,
    /// `None` when the record has no `Key` element.
    key: Option<String>,
    /// `None` per modifier when the element is absent, otherwise whether its
    /// text is exactly `1`.
    modifiers: [Option<bool>; 3],
    input_type: Option<String>,
}

impl InputRecord {
    pub fn from_element(handle: NodePath, record: &Element) -> Self {
        let text = |tag: &str| record.child(tag).and_then(Element::text);
        let modifiers = Modifier::ALL.map(|m| {
            record
                .child(m.tag())
                .map(|el| el.text().as_deref() == Some("1"))
        });

        Self {
            handle,
            event: text("Event"),
            key: record.child("Key").map(|el| el.text().unwrap_or_default()),
            modifiers,
            input_type: text("InputType"),
        }
    }

    pub fn handle(&self) -> &[usize] {
        &self.handle
    }

    /// The `Event` text; `None` when the element is missing or empty.
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    pub fn label(&self) -> &str {
        self.event().unwrap_or(UNKNOWN_EVENT)
    }

    pub fn has_key_field(&self) -> bool {
        self.key.is_some()
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    pub fn has_modifier(&self, m: Modifier) -> bool {
        self.modifiers[m.index()].is_some()
    }

    pub fn modifier(&self, m: Modifier) -> bool {
        self.modifiers[m.index()].unwrap_or(false)
    }

    pub fn input_type(&self) -> Option<&str> {
        self.input_type.as_deref()
    }

    /// At least one modifier field and not a mouse binding.
    pub fn is_editable(&self) -> bool {
        self.modifiers.iter().any(Option::is_some) && self.input_type() != Some("Mouse")
    }
}

/// Editable records in document order: every `RECORD` directly below an
/// `InputMappings` element anywhere beneath the root.
pub fn collect_records(doc: &XmlDocument) -> Vec<InputRecord> {
    let root = doc.root();
    let mut records = Vec::new();
    for mappings_path in root.descendants_named(INPUT_MAPPINGS) {
        let Some(mappings) = root.element_at(&mappings_path) else {
            continue;
        };
        for (i, child) in mappings.child_elements() {
            if child.name() != RECORD {
                continue;
            }
            let mut handle = mappings_path.clone();
            handle.push(i);
            let record = InputRecord::from_element(handle, child);
            if record.is_editable() {
                records.push(record);
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records(xml: &str) -> Vec<InputRecord> {
        collect_records(&XmlDocument::parse(xml.as_bytes()).unwrap())
    }

    fn record(body: &str) -> Vec<InputRecord> {
        records(&format!(
            "<Config><InputMappings><RECORD>{body}</RECORD></InputMappings></Config>"
        ))
    }

    #[test]
    fn modifier_and_non_mouse_input_is_included() {
        let found = record(
            "<Event>Move Forward</Event><Key>W</Key><Shift>0</Shift><InputType>Key</InputType>",
        );

        assert_eq!(found.len(), 1);
        let rec = &found[0];
        assert_eq!(rec.event(), Some("Move Forward"));
        assert_eq!(rec.key(), "W");
        assert!(rec.has_modifier(Modifier::Shift));
        assert!(!rec.modifier(Modifier::Shift));
        assert!(!rec.has_modifier(Modifier::Ctrl));
    }

    #[test]
    fn mouse_input_is_excluded() {
        assert!(record("<Event>Click</Event><Ctrl>1</Ctrl><InputType>Mouse</InputType>").is_empty());
    }

    #[test]
    fn records_without_modifiers_are_excluded() {
        assert!(record("<Event>Jump</Event><Key>SPACE</Key>").is_empty());
    }

    #[test]
    fn input_type_must_be_exactly_mouse_to_exclude() {
        assert_eq!(record("<Alt>1</Alt><InputType>mouse</InputType>").len(), 1);
        assert_eq!(record("<Alt>1</Alt><InputType/>").len(), 1);
        assert_eq!(record("<Alt>1</Alt>").len(), 1);
    }

    #[test]
    fn toggle_is_on_only_for_exact_one() {
        let found = record("<Ctrl>1</Ctrl><Alt> 1</Alt><Shift>true</Shift>");

        assert!(found[0].modifier(Modifier::Ctrl));
        assert!(!found[0].modifier(Modifier::Alt));
        assert!(!found[0].modifier(Modifier::Shift));
    }

    #[test]
    fn missing_event_and_key_have_fallbacks() {
        let found = record("<Ctrl/>");

        assert_eq!(found[0].event(), None);
        assert_eq!(found[0].label(), UNKNOWN_EVENT);
        assert!(!found[0].has_key_field());
        assert_eq!(found[0].key(), "");
        assert!(!found[0].modifier(Modifier::Ctrl));
    }

    #[test]
    fn only_direct_children_of_input_mappings_count() {
        let found = records(
            "<Config>\
               <RECORD><Event>TopLevel</Event><Ctrl>1</Ctrl></RECORD>\
               <Profiles><InputMappings>\
                 <RECORD><Event>First</Event><Ctrl>1</Ctrl></RECORD>\
                 <Group><RECORD><Event>Nested</Event><Ctrl>1</Ctrl></RECORD></Group>\
                 <RECORD><Event>Second</Event><Alt>0</Alt></RECORD>\
               </InputMappings></Profiles>\
               <InputMappings><RECORD><Event>Third</Event><Shift>1</Shift></RECORD></InputMappings>\
             </Config>",
        );

        let events: Vec<_> = found.iter().map(InputRecord::label).collect();
        assert_eq!(events, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn root_named_input_mappings_is_not_a_match() {
        assert!(records("<InputMappings><RECORD><Ctrl>1</Ctrl></RECORD></InputMappings>").is_empty());
    }

    #[test]
    fn handle_points_back_at_the_record() {
        let doc = XmlDocument::parse(
            b"<Config>\n  <InputMappings>\n    <RECORD><Event>E</Event><Ctrl>1</Ctrl></RECORD>\n  </InputMappings>\n</Config>",
        )
        .unwrap();
        let found = collect_records(&doc);

        let el = doc.root().element_at(found[0].handle()).unwrap();
        assert_eq!(el.name(), RECORD);
        assert_eq!(el.child("Event").and_then(Element::text).as_deref(), Some("E"));
    }
}
