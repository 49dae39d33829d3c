//! In-memory editable surface.
//!
//! `Document` plays the part of a browser `contenteditable` element: a flat
//! run of text and element nodes inside one editor container, a single
//! selection, and monospace layout. It implements both selection APIs so the
//! widget can be driven end to end without a real page, and its capability
//! switches emulate hosts that only have one of them (or neither).
//!
//! Native key effects (typing, backspace, caret movement) are applied with
//! [`Document::apply_native`], mirroring what the browser does for keys the
//! widget does not suppress.

use crate::candidate::Element;
use crate::hints_engine::KeyEvent;
use crate::surface::{
    EditableSurface, Layout, LegacyRange, NodeId, OffsetBox, RangeSelectionApi, TextRange,
    TextRangeApi,
};
use crate::utils::{byte_index, char_len, char_slice};

const BODY: NodeId = NodeId(0);
const EDITOR: NodeId = NodeId(1);
const FIRST_NODE: u32 = 2;

/// Which selection APIs the host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub range_selection: bool,
    pub text_range: bool,
}

impl Capabilities {
    pub const ALL: Self = Self { range_selection: true, text_range: true };
    pub const RANGE_ONLY: Self = Self { range_selection: true, text_range: false };
    pub const TEXT_RANGE_ONLY: Self = Self { range_selection: false, text_range: true };
    pub const NONE: Self = Self { range_selection: false, text_range: false };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

/// Monospace layout metrics in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Metrics {
    char_width: i32,
    line_height: i32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self { char_width: 8, line_height: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    /// Rendered text: character data for text nodes, inner text for elements.
    pub fn rendered(&self) -> &str {
        match &self.kind {
            NodeKind::Text(s) => s,
            NodeKind::Element(el) => &el.text,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    id: NodeId,
    host: NodeId,
    offset: usize,
}

/// In-memory editable surface.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    next_id: u32,
    /// Always inside a text node
    selection: TextRange,
    markers: Vec<Marker>,
    metrics: Metrics,
    editor_box: OffsetBox,
    scroll_top: i32,
    capabilities: Capabilities,
}

impl Document {
    /// Empty document with both selection APIs.
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Single text node, caret at the end.
    pub fn with_text(text: &str) -> Self {
        let id = NodeId(FIRST_NODE);
        Self {
            nodes: vec![Node { id, kind: NodeKind::Text(text.to_string()) }],
            next_id: FIRST_NODE + 1,
            selection: TextRange::collapsed(id, char_len(text)),
            markers: Vec::new(),
            metrics: Metrics::default(),
            editor_box: OffsetBox {
                offset_parent: Some(BODY),
                ..Default::default()
            },
            scroll_top: 0,
            capabilities: Capabilities::ALL,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Position of the editor container on the page.
    pub fn with_editor_origin(mut self, left: i32, top: i32) -> Self {
        self.editor_box.offset_left = left;
        self.editor_box.offset_top = top;
        self
    }

    pub fn set_document_scroll_top(&mut self, top: i32) {
        self.scroll_top = top;
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Full rendered text.
    pub fn text(&self) -> String {
        self.nodes.iter().map(Node::rendered).collect()
    }

    /// Inserted elements in document order.
    pub fn elements(&self) -> Vec<&Element> {
        self.nodes
            .iter()
            .filter_map(|n| match &n.kind {
                NodeKind::Element(el) => Some(el),
                NodeKind::Text(_) => None,
            })
            .collect()
    }

    pub fn selection(&self) -> TextRange {
        self.selection
    }

    /// Caret node and char offset.
    pub fn caret(&self) -> (NodeId, usize) {
        (self.selection.node, self.selection.start)
    }

    /// Caret as a document-wide char offset.
    pub fn caret_position(&self) -> usize {
        self.node_start(self.selection.node).unwrap_or(0) + self.selection.start
    }

    /// Number of markers still attached.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Place a collapsed caret. Fails for non-text nodes or out-of-range offsets.
    pub fn set_caret(&mut self, node: NodeId, offset: usize) -> bool {
        match self.text_of(node) {
            Some(text) if offset <= char_len(text) => {
                self.selection = TextRange::collapsed(node, offset);
                true
            }
            _ => false,
        }
    }

    /// Place a collapsed caret at a document-wide char offset.
    pub fn set_caret_position(&mut self, position: usize) -> bool {
        match self.locate(position) {
            Some((idx, local)) if self.nodes[idx].is_text() => {
                self.selection = TextRange::collapsed(self.nodes[idx].id, local);
                true
            }
            _ => false,
        }
    }

    /// Apply the browser's default action for `key`.
    pub fn apply_native(&mut self, key: &KeyEvent) {
        match key {
            KeyEvent::Char(ch) => self.insert_text(&ch.to_string()),
            KeyEvent::Backspace => self.backspace(),
            KeyEvent::Delete => self.delete_forward(),
            KeyEvent::Left => self.move_left(),
            KeyEvent::Right => self.move_right(),
            KeyEvent::Home => self.move_home(),
            KeyEvent::End => self.move_end(),
            KeyEvent::Enter => self.insert_text("\n"),
            KeyEvent::Up | KeyEvent::Down | KeyEvent::Escape | KeyEvent::Tab => {}
        }
    }

    /// Type `text` over the selection.
    pub fn insert_text(&mut self, text: &str) {
        let TextRange { node, start, end } = self.selection;
        let Some(idx) = self.index_of(node) else {
            return;
        };
        if let NodeKind::Text(s) = &mut self.nodes[idx].kind {
            let (bs, be) = (byte_index(s, start), byte_index(s, end));
            s.replace_range(bs..be, text);
            self.selection = TextRange::collapsed(node, start + char_len(text));
        }
    }

    pub fn backspace(&mut self) {
        if !self.selection.is_empty() {
            self.insert_text("");
            return;
        }
        let TextRange { node, start, .. } = self.selection;
        if start > 0 {
            self.selection.start = start - 1;
            self.insert_text("");
            return;
        }
        let Some(idx) = self.index_of(node) else {
            return;
        };
        if idx == 0 {
            return;
        }
        let prev_id = self.nodes[idx - 1].id;
        if let NodeKind::Text(prev) = &mut self.nodes[idx - 1].kind {
            if prev.pop().is_some() {
                let len = char_len(prev);
                self.selection = TextRange::collapsed(prev_id, len);
            }
        } else {
            self.nodes.remove(idx - 1);
        }
        self.normalize();
    }

    pub fn delete_forward(&mut self) {
        if !self.selection.is_empty() {
            self.insert_text("");
            return;
        }
        let TextRange { node, start, .. } = self.selection;
        let Some(idx) = self.index_of(node) else {
            return;
        };
        let len = char_len(self.nodes[idx].rendered());
        if start < len {
            self.selection.end = start + 1;
            self.insert_text("");
            return;
        }
        if idx + 1 < self.nodes.len() {
            if let NodeKind::Text(next) = &mut self.nodes[idx + 1].kind {
                if !next.is_empty() {
                    next.remove(0);
                }
            } else {
                self.nodes.remove(idx + 1);
            }
            self.normalize();
        }
    }

    pub fn move_left(&mut self) {
        let TextRange { node, start, .. } = self.selection;
        if start > 0 {
            self.selection = TextRange::collapsed(node, start - 1);
            return;
        }
        let Some(idx) = self.index_of(node) else {
            return;
        };
        if let Some(prev) = self.nodes[..idx].iter().rev().find(|n| n.is_text()) {
            self.selection = TextRange::collapsed(prev.id, char_len(prev.rendered()));
        }
    }

    pub fn move_right(&mut self) {
        let TextRange { node, end, .. } = self.selection;
        let Some(idx) = self.index_of(node) else {
            return;
        };
        if end < char_len(self.nodes[idx].rendered()) {
            self.selection = TextRange::collapsed(node, end + 1);
            return;
        }
        if let Some(next) = self.nodes[idx + 1..].iter().find(|n| n.is_text()) {
            self.selection = TextRange::collapsed(next.id, 0);
        }
    }

    pub fn move_home(&mut self) {
        if let Some(first) = self.nodes.iter().find(|n| n.is_text()) {
            self.selection = TextRange::collapsed(first.id, 0);
        }
    }

    pub fn move_end(&mut self) {
        if let Some(last) = self.nodes.iter().rev().find(|n| n.is_text()) {
            self.selection = TextRange::collapsed(last.id, char_len(last.rendered()));
        }
    }

    /// Replace the selection with an element, leaving the caret at the start
    /// of a fresh text node after it.
    fn replace_selection_with_element(&mut self, element: &Element) -> bool {
        let TextRange { node, start, end } = self.selection;
        let Some(idx) = self.index_of(node) else {
            return false;
        };
        let NodeKind::Text(s) = &mut self.nodes[idx].kind else {
            return false;
        };
        let tail = s[byte_index(s, end)..].to_string();
        s.truncate(byte_index(s, start));

        let element_id = self.alloc_id();
        let tail_id = self.alloc_id();
        self.nodes.insert(
            idx + 1,
            Node { id: element_id, kind: NodeKind::Element(element.clone()) },
        );
        self.nodes.insert(idx + 2, Node { id: tail_id, kind: NodeKind::Text(tail) });
        self.selection = TextRange::collapsed(tail_id, 0);
        true
    }

    /// Merge adjacent text nodes, carrying the selection along.
    fn normalize(&mut self) {
        let mut i = 0;
        while i + 1 < self.nodes.len() {
            if self.nodes[i].is_text() && self.nodes[i + 1].is_text() {
                let removed = self.nodes.remove(i + 1);
                let keep_id = self.nodes[i].id;
                if let NodeKind::Text(s) = &mut self.nodes[i].kind {
                    let shift = char_len(s);
                    s.push_str(removed.rendered());
                    if self.selection.node == removed.id {
                        self.selection = TextRange {
                            node: keep_id,
                            start: self.selection.start + shift,
                            end: self.selection.end + shift,
                        };
                    }
                }
            } else {
                i += 1;
            }
        }
        if self.nodes.is_empty() {
            let id = self.alloc_id();
            self.nodes.push(Node { id, kind: NodeKind::Text(String::new()) });
            self.selection = TextRange::collapsed(id, 0);
        }
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn index_of(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == node)
    }

    fn text_of(&self, node: NodeId) -> Option<&str> {
        self.nodes.iter().find(|n| n.id == node).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            NodeKind::Element(_) => None,
        })
    }

    fn node_start(&self, node: NodeId) -> Option<usize> {
        let mut pos = 0;
        for n in &self.nodes {
            if n.id == node {
                return Some(pos);
            }
            pos += char_len(n.rendered());
        }
        None
    }

    fn total_len(&self) -> usize {
        self.nodes.iter().map(|n| char_len(n.rendered())).sum()
    }

    /// Node index and local offset for a document offset, preferring text
    /// nodes on boundaries.
    fn locate(&self, position: usize) -> Option<(usize, usize)> {
        let mut pos = 0;
        let mut inside_element = None;
        for (idx, n) in self.nodes.iter().enumerate() {
            let len = char_len(n.rendered());
            if n.is_text() && position >= pos && position <= pos + len {
                return Some((idx, position - pos));
            }
            if !n.is_text() && position > pos && position < pos + len {
                inside_element = Some((idx, position - pos));
            }
            pos += len;
        }
        inside_element
    }

    /// Pixel position of char `offset` in `node`, relative to the editor.
    fn flow_position(&self, node: NodeId, offset: usize) -> (i32, i32) {
        let (mut line, mut col) = (0i32, 0i32);
        for n in &self.nodes {
            let take = if n.id == node { offset } else { usize::MAX };
            for ch in n.rendered().chars().take(take) {
                if ch == '\n' {
                    line += 1;
                    col = 0;
                } else {
                    col += 1;
                }
            }
            if n.id == node {
                break;
            }
        }
        (col * self.metrics.char_width, line * self.metrics.line_height)
    }

    fn inline_box(&self, node: NodeId, offset: usize) -> OffsetBox {
        let (left, top) = self.flow_position(node, offset);
        OffsetBox {
            offset_left: left,
            offset_top: top,
            offset_parent: Some(EDITOR),
            ..Default::default()
        }
    }

    /// Selection from document offsets, confined to the text node holding
    /// `range.end`.
    fn select_legacy(&mut self, range: &LegacyRange) -> bool {
        let Some((idx, local_end)) = self.locate(range.end) else {
            return false;
        };
        let node = &self.nodes[idx];
        if !node.is_text() {
            return false;
        }
        let start = self.node_start(node.id).unwrap_or(0);
        if range.start < start {
            return false;
        }
        self.selection = TextRange {
            node: node.id,
            start: range.start - start,
            end: local_end,
        };
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout for Document {
    fn offset_box(&self, node: NodeId) -> Option<OffsetBox> {
        if node == BODY {
            return Some(OffsetBox::default());
        }
        if node == EDITOR {
            return Some(self.editor_box);
        }
        if let Some(marker) = self.markers.iter().find(|m| m.id == node) {
            return Some(self.inline_box(marker.host, marker.offset));
        }
        self.index_of(node).map(|_| self.inline_box(node, 0))
    }

    fn document_scroll_top(&self) -> i32 {
        self.scroll_top
    }
}

impl RangeSelectionApi for Document {
    fn anchor_node(&self) -> Option<NodeId> {
        Some(self.selection.node)
    }

    fn first_range(&self) -> Option<TextRange> {
        Some(self.selection)
    }

    fn node_text(&self, node: NodeId) -> Option<String> {
        self.text_of(node).map(str::to_string)
    }

    fn select(&mut self, range: TextRange) -> bool {
        match self.text_of(range.node) {
            Some(text) if range.start <= range.end && range.end <= char_len(text) => {
                self.selection = range;
                true
            }
            _ => false,
        }
    }

    fn insert_markup(&mut self, markup: &str) -> bool {
        if self.text_of(self.selection.node).is_none() {
            return false;
        }
        self.insert_text(markup);
        true
    }

    fn insert_element(&mut self, element: &Element) -> bool {
        self.replace_selection_with_element(element)
    }

    fn insert_marker(&mut self, node: NodeId, offset: usize) -> Option<NodeId> {
        let len = char_len(self.text_of(node)?);
        let id = self.alloc_id();
        self.markers.push(Marker { id, host: node, offset: offset.min(len) });
        Some(id)
    }

    fn remove_marker(&mut self, marker: NodeId) {
        self.markers.retain(|m| m.id != marker);
    }
}

impl TextRangeApi for Document {
    fn create_range(&self) -> LegacyRange {
        let start = self.node_start(self.selection.node).unwrap_or(0);
        LegacyRange {
            start: start + self.selection.start,
            end: start + self.selection.end,
        }
    }

    fn parent_element(&self, range: &LegacyRange) -> Option<NodeId> {
        self.locate(range.end).map(|(idx, _)| self.nodes[idx].id)
    }

    fn element_start(&self, node: NodeId) -> Option<usize> {
        self.node_start(node)
    }

    fn element_text(&self, node: NodeId) -> Option<String> {
        self.nodes
            .iter()
            .find(|n| n.id == node)
            .map(|n| n.rendered().to_string())
    }

    fn move_start(&self, range: &mut LegacyRange, units: isize) -> isize {
        let target = (range.start as isize + units).clamp(0, self.total_len() as isize) as usize;
        let moved = target as isize - range.start as isize;
        range.start = target;
        if range.end < range.start {
            range.end = range.start;
        }
        moved
    }

    fn move_end(&self, range: &mut LegacyRange, units: isize) -> isize {
        let target = (range.end as isize + units).clamp(0, self.total_len() as isize) as usize;
        let moved = target as isize - range.end as isize;
        range.end = target;
        if range.start > range.end {
            range.start = range.end;
        }
        moved
    }

    fn range_text(&self, range: &LegacyRange) -> String {
        char_slice(&self.text(), range.start, range.end).to_string()
    }

    fn select(&mut self, range: &LegacyRange) {
        self.select_legacy(range);
    }

    fn paste_markup(&mut self, range: &LegacyRange, markup: &str) -> bool {
        if !self.select_legacy(range) {
            return false;
        }
        self.insert_text(markup);
        true
    }

    fn paste_element(&mut self, range: &LegacyRange, element: &Element) -> bool {
        self.select_legacy(range) && self.replace_selection_with_element(element)
    }
}

impl EditableSurface for Document {
    fn range_selection(&mut self) -> Option<&mut dyn RangeSelectionApi> {
        if self.capabilities.range_selection {
            Some(self)
        } else {
            None
        }
    }

    fn text_range_selection(&mut self) -> Option<&mut dyn TextRangeApi> {
        if self.capabilities.text_range {
            Some(self)
        } else {
            None
        }
    }
}
