//! Candidate types for hint suggestions.
//!
//! This module provides:
//! - `Candidate`: A display text with the value that replaces the typed span
//! - `HintValue` / `Element`: Replacement payloads (markup or structured node)
//! - `HintList`: Filtered candidates with a highlight cursor and scroll viewport

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A structured node inserted in place of the typed keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
}

impl Element {
    pub fn new<T: Into<String>, U: Into<String>>(tag: T, text: U) -> Self {
        Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: text.into(),
        }
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Serialize as an HTML-like tag, attributes in key order.
    pub fn to_markup(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", key, value));
        }
        out.push('>');
        out.push_str(&self.text);
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

/// Replacement payload of a candidate.
///
/// A JSON string deserializes to `Markup`, an object to `Element`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    Markup(String),
    Element(Element),
}

impl From<&str> for HintValue {
    fn from(value: &str) -> Self {
        HintValue::Markup(value.to_string())
    }
}

impl From<String> for HintValue {
    fn from(value: String) -> Self {
        HintValue::Markup(value)
    }
}

impl From<Element> for HintValue {
    fn from(value: Element) -> Self {
        HintValue::Element(value)
    }
}

/// A selectable suggestion.
///
/// Identity is the position in the configured list, not the text: duplicate
/// texts are legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub value: HintValue,
}

impl Candidate {
    pub fn new<T: Into<String>, V: Into<HintValue>>(text: T, value: V) -> Self {
        Candidate {
            text: text.into(),
            value: value.into(),
        }
    }

    /// Candidate whose replacement is its own display text.
    pub fn plain<T: Into<String>>(text: T) -> Self {
        let text = text.into();
        Candidate {
            value: HintValue::Markup(text.clone()),
            text,
        }
    }

    /// Parse a JSON hint list: `[{"text": "...", "value": ...}, ...]`.
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Candidate>> {
        serde_json::from_str(json).map_err(|e| crate::HintsError::Config(format!("hint list: {}", e)))
    }
}

/// A filtered candidate together with its index in the configured list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintEntry {
    pub index: usize,
    pub candidate: Candidate,
}

/// Filtered candidates with a highlight cursor.
///
/// Only `visible_rows` entries fit in the menu at once; the viewport follows
/// the highlight the way `scrollIntoView(false)` does, aligning the
/// highlighted row with the bottom edge.
#[derive(Debug, Clone)]
pub struct HintList {
    /// Entries in source order
    entries: Vec<HintEntry>,

    /// Rows shown at once
    visible_rows: usize,

    /// First visible row
    scroll_top: usize,

    /// Highlighted entry (0-based, global)
    cursor: usize,
}

impl HintList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self::with_visible_rows(5)
    }

    /// Create a list with the given viewport height.
    pub fn with_visible_rows(visible_rows: usize) -> Self {
        Self {
            entries: Vec::new(),
            visible_rows: visible_rows.max(1), // Ensure at least 1
            scroll_top: 0,
            cursor: 0,
        }
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Replace the entries, highlighting the first one.
    pub fn set_entries(&mut self, entries: Vec<HintEntry>) {
        self.entries = entries;
        self.scroll_top = 0;
        self.cursor = 0;
    }

    pub fn entries(&self) -> &[HintEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highlighted position. Meaningless when the list is empty.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn highlighted(&self) -> Option<&HintEntry> {
        self.entries.get(self.cursor)
    }

    /// Move the highlight up. Returns true if it moved.
    pub fn cursor_up(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.scroll_into_view();
            true
        } else {
            false
        }
    }

    /// Move the highlight down. Returns true if it moved.
    pub fn cursor_down(&mut self) -> bool {
        if !self.entries.is_empty() && self.cursor < self.entries.len() - 1 {
            self.cursor += 1;
            self.scroll_into_view();
            true
        } else {
            false
        }
    }

    fn scroll_into_view(&mut self) {
        self.scroll_top = (self.cursor + 1).saturating_sub(self.visible_rows);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_top = 0;
        self.cursor = 0;
    }
}

impl Default for HintList {
    fn default() -> Self {
        Self::new()
    }
}
