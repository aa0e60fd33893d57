//! # OSIS Reader
//!
//! Parses OSIS XML into [`MarkupNode`] trees and splits out verses.
//!
//! Shape of the produced tree:
//! - each XML element becomes an [`Element`] keyed by its name,
//!   children kept in document order
//! - a `<w>` word is flattened: every text run in its subtree, inline
//!   `<seg>` included, is joined in order into its inline `text`
//! - any other element with no child elements gets its text as inline `text`
//! - any other element with child elements keeps non-blank text runs as
//!   ordered text leaves under [`TEXT_RUN_KEY`]
//!
//! Only container `<verse osisID="…">…</verse>` elements are collected.
//!
//! ## Limits
//!
//! Input larger than `MAX_DOCUMENT_SIZE` is rejected before parsing.

use crate::node::{Element, MarkupNode, TEXT_RUN_KEY};
use crate::primitives::{OSIS_ID_ATTRIBUTE, VERSE_ELEMENT, WORD_ELEMENT};
use crate::types::{MikraError, VerseRef};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Maximum accepted document size (64 MB).
///
/// The largest book of the Hebrew Bible is a few MB of OSIS.
pub const MAX_DOCUMENT_SIZE: usize = 64 * 1024 * 1024;

/// One verse of an OSIS document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsisVerse {
    pub reference: VerseRef,
    pub element: Element,
}

/// Parse a whole OSIS document.
///
/// Returns an anonymous root element whose children are the document's
/// top-level elements.
pub fn parse_document(bytes: &[u8]) -> Result<Element, MikraError> {
    if bytes.len() > MAX_DOCUMENT_SIZE {
        return Err(MikraError::Markup(format!(
            "Document size {} bytes exceeds maximum {} bytes",
            bytes.len(),
            MAX_DOCUMENT_SIZE
        )));
    }

    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = vec![Element::new("")];

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            MikraError::Markup(format!(
                "XML error at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = close_element(open_element(&start)?);
                attach(&mut stack, element)?;
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(MikraError::Markup("Unbalanced closing tag".to_string()));
                }
                if let Some(element) = stack.pop() {
                    attach(&mut stack, close_element(element))?;
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| MikraError::Markup(e.to_string()))?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&bytes));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(MikraError::Markup(format!(
            "Unclosed element at end of document: <{}>",
            stack.last().map(|e| e.name.as_str()).unwrap_or_default()
        )));
    }

    stack
        .pop()
        .map(close_element)
        .ok_or_else(|| MikraError::Markup("Empty document".to_string()))
}

/// Parse a document and return its verses in document order.
///
/// Verses without a usable `osisID` are skipped.
pub fn read_verses(bytes: &[u8]) -> Result<Vec<OsisVerse>, MikraError> {
    let root = parse_document(bytes)?;
    let mut verses = Vec::new();
    collect_children(root, &mut verses);
    Ok(verses)
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, MikraError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| MikraError::Markup(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| MikraError::Markup(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

/// Flatten words, fold leaf text runs into inline text, or drop blank runs
/// between elements.
fn close_element(mut element: Element) -> Element {
    if element.name == WORD_ELEMENT {
        let mut text = String::new();
        for (_, child) in element.children.drain(..) {
            append_text(&child, &mut text);
        }
        if !text.trim().is_empty() {
            element.text = Some(text);
        }
        return element;
    }

    let has_elements = element.children.iter().any(|(key, _)| key != TEXT_RUN_KEY);

    if has_elements {
        element.children.retain(|(key, node)| {
            key != TEXT_RUN_KEY || !matches!(node, MarkupNode::Text(t) if t.trim().is_empty())
        });
    } else {
        let text: String = element
            .children
            .drain(..)
            .filter_map(|(_, node)| match node {
                MarkupNode::Text(t) => Some(t),
                MarkupNode::List(_) | MarkupNode::Element(_) => None,
            })
            .collect();
        if !text.trim().is_empty() {
            element.text = Some(text);
        }
    }

    element
}

/// Append every text run under `node` in document order.
fn append_text(node: &MarkupNode, out: &mut String) {
    match node {
        MarkupNode::Text(text) => out.push_str(text),
        MarkupNode::List(items) => {
            for item in items {
                append_text(item, out);
            }
        }
        MarkupNode::Element(element) => {
            if let Some(text) = &element.text {
                out.push_str(text);
            }
            for (_, child) in &element.children {
                append_text(child, out);
            }
        }
    }
}

fn attach(stack: &mut [Element], element: Element) -> Result<(), MikraError> {
    let parent = stack
        .last_mut()
        .ok_or_else(|| MikraError::Markup("Element outside document".to_string()))?;
    parent.push_element(element);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent
            .children
            .push((TEXT_RUN_KEY.to_string(), MarkupNode::Text(text.to_string())));
    }
}

fn collect_children(element: Element, out: &mut Vec<OsisVerse>) {
    for (_, child) in element.children {
        collect_node(child, out);
    }
}

fn collect_node(node: MarkupNode, out: &mut Vec<OsisVerse>) {
    match node {
        MarkupNode::Element(element) if element.name == VERSE_ELEMENT => {
            let reference = element
                .attribute(OSIS_ID_ATTRIBUTE)
                .and_then(|id| id.split_whitespace().next())
                .and_then(|id| VerseRef::parse_osis(id).ok());
            if let Some(reference) = reference {
                out.push(OsisVerse { reference, element });
            }
        }
        MarkupNode::Element(element) => collect_children(element, out),
        MarkupNode::List(items) => {
            for item in items {
                collect_node(item, out);
            }
        }
        MarkupNode::Text(_) => {}
    }
}

// =============================================================================
// TESTS
// =============================================================================
