//! # Markup Tree
//!
//! The generic, already-parsed shape of one verse's markup.
//!
//! A node is exactly one of:
//! - a text leaf,
//! - an ordered list of sibling nodes sharing one key,
//! - an element with attributes, optional inline text and ordered children.
//!
//! Attributes and inline text live in their own fields, so the walk can
//! never mistake them for child elements. A key holding one element and
//! a key holding a list of elements are both reachable through
//! [`MarkupNode::elements`] without special-casing.

use crate::primitives::TYPE_ATTRIBUTE;
use serde_json::Value as JsonValue;

/// Key holding the attribute object in the xml-to-JSON convention.
pub const JSON_ATTRIBUTES_KEY: &str = "$";

/// Key holding the inline text in the xml-to-JSON convention.
pub const JSON_TEXT_KEY: &str = "_";

/// Child key used for text runs that sit between child elements.
pub const TEXT_RUN_KEY: &str = "#text";

/// One node of a markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// A text leaf.
    Text(String),
    /// Ordered siblings.
    List(Vec<MarkupNode>),
    /// An element.
    Element(Element),
}

/// An element: attributes, inline text and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Element name (`w`, `seg`, `note`, ...). Empty for anonymous roots.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// The element's own text, if any.
    pub text: Option<String>,
    /// Children as `(key, node)` pairs in document order.
    pub children: Vec<(String, MarkupNode)>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set the inline text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element under its own name.
    #[must_use]
    pub fn with_element(mut self, child: Element) -> Self {
        self.push_element(child);
        self
    }

    /// Append an arbitrary child node under `key`.
    #[must_use]
    pub fn with_child(mut self, key: impl Into<String>, node: MarkupNode) -> Self {
        self.children.push((key.into(), node));
        self
    }

    /// Append a child element under its own name.
    pub fn push_element(&mut self, child: Element) {
        self.children
            .push((child.name.clone(), MarkupNode::Element(child)));
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The element's `type` attribute.
    #[must_use]
    pub fn element_type(&self) -> Option<&str> {
        self.attribute(TYPE_ATTRIBUTE)
    }

    /// Every element stored under `key`, singleton or list alike.
    pub fn child_elements<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |(k, _)| k == key)
            .flat_map(|(_, node)| node.elements())
    }

    /// Build an element from an xml-to-JSON object.
    ///
    /// `"$"` holds attributes, `"_"` holds inline text, and every other
    /// key is a child element or an array of them. Object key order is
    /// kept as document order.
    #[must_use]
    pub fn from_json(name: &str, object: &serde_json::Map<String, JsonValue>) -> Self {
        let mut element = Self::new(name);

        for (key, value) in object {
            match key.as_str() {
                JSON_ATTRIBUTES_KEY => {
                    if let JsonValue::Object(attrs) = value {
                        element.attributes = attrs
                            .iter()
                            .map(|(k, v)| (k.clone(), json_scalar(v)))
                            .collect();
                    }
                }
                JSON_TEXT_KEY => {
                    if let JsonValue::String(text) = value {
                        element.text = Some(text.clone());
                    }
                }
                _ => element
                    .children
                    .push((key.clone(), MarkupNode::from_json_named(key, value))),
            }
        }

        element
    }
}

impl MarkupNode {
    /// The elements this node holds: itself, or the elements of a list.
    ///
    /// Text leaves hold no elements.
    #[must_use]
    pub fn elements(&self) -> Vec<&Element> {
        match self {
            Self::Text(_) => Vec::new(),
            Self::Element(element) => vec![element],
            Self::List(items) => items.iter().flat_map(Self::elements).collect(),
        }
    }

    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) | Self::List(_) => None,
        }
    }

    /// Convert an xml-to-JSON value into a tree.
    #[must_use]
    pub fn from_json(value: &JsonValue) -> Self {
        Self::from_json_named("", value)
    }

    /// Convert an xml-to-JSON value found under `name`.
    ///
    /// Numbers, booleans and null become empty text.
    #[must_use]
    pub fn from_json_named(name: &str, value: &JsonValue) -> Self {
        match value {
            JsonValue::String(text) => Self::Text(text.clone()),
            JsonValue::Array(items) => Self::List(
                items
                    .iter()
                    .map(|item| Self::from_json_named(name, item))
                    .collect(),
            ),
            JsonValue::Object(object) => Self::Element(Element::from_json(name, object)),
            JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => {
                Self::Text(String::new())
            }
        }
    }
}

impl From<Element> for MarkupNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

fn json_scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
