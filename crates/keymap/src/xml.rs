//! Minimal mutable XML tree on top of `quick_xml`.
//!
//! The tree keeps raw tag text, raw escaped character data, comments and
//! whitespace, so writing an unmodified document reproduces its bytes. Only
//! the declaration is rebuilt, with the encoding forced to UTF-8. Processing
//! instructions are dropped.

use std::borrow::Cow;

use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::XmlError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Child-index path from the root element to one of its descendants.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(Text),
    CData(String),
    Comment(String),
    DocType(String),
}

/// Character data as written in the file and as decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    raw: String,
    value: String,
}

impl Text {
    fn parse(raw: &str) -> Result<Self, XmlError> {
        let value = unescape(raw)
            .map_err(|e| XmlError::Malformed(format!("bad character data {raw:?}: {e}")))?
            .into_owned();
        Ok(Self {
            raw: raw.to_owned(),
            value,
        })
    }

    fn new(value: &str) -> Self {
        Self {
            raw: partial_escape(value).into_owned(),
            value: value.to_owned(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn is_blank(&self) -> bool {
        self.raw.chars().all(char::is_whitespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Everything between `<` and `>` of the start tag, minus a trailing `/`.
    start: String,
    name_len: usize,
    self_closing: bool,
    children: Vec<Node>,
}

impl Element {
    fn from_start(e: &BytesStart<'_>, self_closing: bool) -> Result<Self, XmlError> {
        let start = std::str::from_utf8(e)
            .map_err(|e| XmlError::Malformed(format!("tag is not UTF-8: {e}")))?
            .to_owned();
        Ok(Self {
            start,
            name_len: e.name().as_ref().len(),
            self_closing,
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.start[..self.name_len]
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements with their index among all children.
    pub fn child_elements(&self) -> impl Iterator<Item = (usize, &Element)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match node {
                Node::Element(el) => Some((i, el)),
                _ => None,
            })
    }

    /// First direct child element called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements()
            .map(|(_, el)| el)
            .find(|el| el.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.name() == name => Some(el),
            _ => None,
        })
    }

    /// Character data ahead of the first child element, `None` when empty.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => text.push_str(t.value()),
                Node::CData(c) => text.push_str(c),
                Node::Comment(_) => {}
                Node::Element(_) | Node::DocType(_) => break,
            }
        }
        (!text.is_empty()).then_some(text)
    }

    /// Replaces the leading character data. An empty string leaves the
    /// element without text.
    pub fn set_text(&mut self, value: &str) {
        let lead = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(_) | Node::DocType(_)))
            .unwrap_or(self.children.len());
        let mut idx = 0;
        self.children.retain(|node| {
            let keep = idx >= lead || !matches!(node, Node::Text(_) | Node::CData(_));
            idx += 1;
            keep
        });
        if !value.is_empty() {
            self.children.insert(0, Node::Text(Text::new(value)));
            if self.self_closing {
                self.self_closing = false;
                let trimmed = self.start.trim_end().len();
                self.start.truncate(trimmed);
            }
        }
    }

    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        let Some((&first, rest)) = path.split_first() else {
            return Some(self);
        };
        match self.children.get(first)? {
            Node::Element(el) => el.element_at(rest),
            _ => None,
        }
    }

    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let Some((&first, rest)) = path.split_first() else {
            return Some(self);
        };
        match self.children.get_mut(first)? {
            Node::Element(el) => el.element_at_mut(rest),
            _ => None,
        }
    }

    /// Paths of every descendant (not `self`) called `name`, in document
    /// order.
    pub fn descendants_named(&self, name: &str) -> Vec<NodePath> {
        let mut found = Vec::new();
        let mut prefix = Vec::new();
        self.collect_named(name, &mut prefix, &mut found);
        found
    }

    fn collect_named(&self, name: &str, prefix: &mut NodePath, found: &mut Vec<NodePath>) {
        for (i, child) in self.child_elements() {
            prefix.push(i);
            if child.name() == name {
                found.push(prefix.clone());
            }
            child.collect_named(name, prefix, found);
            prefix.pop();
        }
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), XmlError> {
        let start = BytesStart::from_content(self.start.as_str(), self.name_len);
        if self.self_closing {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name())))?;
        Ok(())
    }
}

impl Node {
    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), XmlError> {
        match self {
            Node::Element(el) => return el.write(writer),
            Node::Text(t) => {
                writer.write_event(Event::Text(BytesText::from_escaped(t.raw.as_str())))?
            }
            Node::CData(c) => writer.write_event(Event::CData(BytesCData::new(c.as_str())))?,
            Node::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?
            }
            Node::DocType(d) => {
                writer.write_event(Event::DocType(BytesText::from_escaped(d.as_str())))?
            }
        }
        Ok(())
    }
}

/// A parsed document: optional declaration, one root element and whatever
/// comments and whitespace surround it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    bom: bool,
    declaration: Option<Declaration>,
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl XmlDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self, XmlError> {
        let (bom, bytes) = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => (true, rest),
            None => (false, bytes),
        };
        let text = std::str::from_utf8(bytes)
            .map_err(|e| XmlError::Malformed(format!("document is not UTF-8: {e}")))?;

        let mut reader = Reader::from_str(text);
        let mut declaration = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<Element> = None;
        let mut open: Vec<Element> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                XmlError::Malformed(format!("{e} at byte {}", reader.buffer_position()))
            })?;

            let node = match event {
                Event::Eof => break,
                Event::Decl(d) => {
                    if root.is_some() || !open.is_empty() || declaration.is_some() {
                        return Err(XmlError::Malformed("misplaced XML declaration".into()));
                    }
                    declaration = Some(read_declaration(&d)?);
                    continue;
                }
                Event::PI(_) => continue,
                Event::Start(e) => {
                    if open.is_empty() && root.is_some() {
                        return Err(XmlError::Malformed("content after the root element".into()));
                    }
                    open.push(Element::from_start(&e, false)?);
                    continue;
                }
                Event::End(e) => {
                    let Some(el) = open.pop() else {
                        return Err(XmlError::Malformed("unexpected closing tag".into()));
                    };
                    if e.name().as_ref() != el.name().as_bytes() {
                        return Err(XmlError::Malformed(format!(
                            "mismatched closing tag for <{}>",
                            el.name()
                        )));
                    }
                    Node::Element(el)
                }
                Event::Empty(e) => {
                    if open.is_empty() && root.is_some() {
                        return Err(XmlError::Malformed("content after the root element".into()));
                    }
                    Node::Element(Element::from_start(&e, true)?)
                }
                Event::Text(t) => Node::Text(Text::parse(&utf8(&t)?)?),
                Event::CData(c) => Node::CData(utf8(&c)?.into_owned()),
                Event::Comment(c) => Node::Comment(utf8(&c)?.into_owned()),
                Event::DocType(d) => Node::DocType(utf8(&d)?.into_owned()),
            };

            if let Some(parent) = open.last_mut() {
                parent.children.push(node);
                continue;
            }
            match node {
                Node::Element(el) => root = Some(el),
                Node::Text(t) if !t.is_blank() => {
                    return Err(XmlError::Malformed("text outside the root element".into()));
                }
                Node::CData(_) => {
                    return Err(XmlError::Malformed("CDATA outside the root element".into()));
                }
                other if root.is_some() => epilog.push(other),
                other => prolog.push(other),
            }
        }

        if let Some(el) = open.last() {
            return Err(XmlError::Malformed(format!("unclosed element <{}>", el.name())));
        }
        let root = root.ok_or_else(|| XmlError::Malformed("no root element".into()))?;

        Ok(Self {
            bom,
            declaration,
            prolog,
            root,
            epilog,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Serializes the whole tree as UTF-8.
    pub fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        let mut out = Vec::new();
        if self.bom {
            out.extend_from_slice(UTF8_BOM);
        }
        let mut writer = Writer::new(out);
        if let Some(decl) = &self.declaration {
            let encoding = decl.encoding.as_deref().map(|enc| {
                if enc.eq_ignore_ascii_case("utf-8") {
                    enc
                } else {
                    "UTF-8"
                }
            });
            writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                encoding,
                decl.standalone.as_deref(),
            )))?;
        }
        for node in &self.prolog {
            node.write(&mut writer)?;
        }
        self.root.write(&mut writer)?;
        for node in &self.epilog {
            node.write(&mut writer)?;
        }
        Ok(writer.into_inner())
    }
}

fn utf8(bytes: &[u8]) -> Result<Cow<'_, str>, XmlError> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|e| XmlError::Malformed(format!("content is not UTF-8: {e}")))
}

fn read_declaration(d: &BytesDecl<'_>) -> Result<Declaration, XmlError> {
    let version = owned(d.version().map_err(bad_declaration)?)?;
    let encoding = match d.encoding() {
        Some(enc) => Some(owned(enc.map_err(bad_declaration)?)?),
        None => None,
    };
    let standalone = match d.standalone() {
        Some(sa) => Some(owned(sa.map_err(bad_declaration)?)?),
        None => None,
    };

    Ok(Declaration {
        version,
        encoding,
        standalone,
    })
}

fn owned(value: Cow<'_, [u8]>) -> Result<String, XmlError> {
    utf8(&value).map(Cow::into_owned)
}

fn bad_declaration(e: impl std::fmt::Display) -> XmlError {
    XmlError::Malformed(format!("bad XML declaration: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- client settings -->
<Config>
  <Graphics Width="1024"/>
  <InputMappings>
    <RECORD>
      <Event>Chat &amp; Say</Event>
      <Key />
    </RECORD>
  </InputMappings>
</Config>
"#;

    #[test]
    fn untouched_document_is_written_back_verbatim() {
        let doc = XmlDocument::parse(SAMPLE.as_bytes()).unwrap();

        assert_eq!(String::from_utf8(doc.to_bytes().unwrap()).unwrap(), SAMPLE);
    }

    #[test]
    fn text_is_unescaped_and_escaped_again() {
        let mut doc = XmlDocument::parse(SAMPLE.as_bytes()).unwrap();
        let path = doc.root().descendants_named("Event").remove(0);
        let event = doc.root().element_at(&path).unwrap();
        assert_eq!(event.text().as_deref(), Some("Chat & Say"));

        doc.root_mut()
            .element_at_mut(&path)
            .unwrap()
            .set_text("<Talk>");
        let out = String::from_utf8(doc.to_bytes().unwrap()).unwrap();
        assert!(out.contains("<Event>&lt;Talk&gt;</Event>"));
    }

    #[test]
    fn self_closing_element_expands_when_given_text() {
        let mut doc = XmlDocument::parse(SAMPLE.as_bytes()).unwrap();
        let path = doc.root().descendants_named("Key").remove(0);
        assert_eq!(doc.root().element_at(&path).unwrap().text(), None);

        doc.root_mut().element_at_mut(&path).unwrap().set_text("W");
        let out = String::from_utf8(doc.to_bytes().unwrap()).unwrap();
        assert!(out.contains("<Key>W</Key>"));
    }

    #[test]
    fn descendants_are_found_in_document_order() {
        let doc = XmlDocument::parse(b"<a><b><c/></b><c><c/></c></a>").unwrap();

        assert_eq!(
            doc.root().descendants_named("c"),
            vec![vec![0, 0], vec![1], vec![1, 0]]
        );
        assert!(doc.root().descendants_named("a").is_empty());
    }

    #[test]
    fn foreign_encoding_is_declared_as_utf8() {
        let doc = XmlDocument::parse(
            br#"<?xml version="1.0" encoding="ISO-8859-1" standalone="yes"?><a/>"#,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(doc.to_bytes().unwrap()).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a/>"#
        );
    }

    #[test]
    fn byte_order_mark_survives() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(b"<a>x</a>");

        let doc = XmlDocument::parse(&input).unwrap();
        assert_eq!(doc.to_bytes().unwrap(), input);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        for bad in [
            "",
            "   ",
            "<a><b></a>",
            "<a><b>",
            "<a/><b/>",
            "<a/>trailing",
            "</a>",
            "<a>&bogus;</a>",
        ] {
            assert!(
                matches!(XmlDocument::parse(bad.as_bytes()), Err(XmlError::Malformed(_))),
                "{bad:?} should be malformed"
            );
        }
        assert!(XmlDocument::parse(&[b'<', b'a', b'>', 0xff, b'<', b'/', b'a', b'>']).is_err());
    }
}
