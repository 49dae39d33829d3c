//! Host capabilities of an editable surface.
//!
//! The widget never owns a text buffer. Everything it knows about the text is
//! read through one of two selection APIs the host may expose:
//!
//! - [`RangeSelectionApi`]: node/offset ranges (`getSelection().getRangeAt(0)`
//!   style). Offsets are relative to the node holding the caret.
//! - [`TextRangeApi`]: legacy text ranges. Offsets are document-wide and a
//!   range can only be moved relative to where it currently is.
//!
//! Both share [`Layout`] for offset-parent geometry. A surface advertises
//! which APIs it has through [`EditableSurface`]; the resolver picks one at
//! construction.
//!
//! All offsets count chars, not bytes.

use crate::candidate::Element;
use std::cell::RefCell;
use std::rc::Rc;

/// Handle of a node (text, element, container or marker) on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Half-open char span `[start, end)` inside one text node.
///
/// Transient: valid only for the event that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn collapsed(node: NodeId, offset: usize) -> Self {
        TextRange {
            node,
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Document-wide char span of a legacy text range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyRange {
    pub start: usize,
    pub end: usize,
}

impl LegacyRange {
    /// Collapse onto the end point (`collapse(false)`).
    pub fn collapse_to_end(&mut self) {
        self.start = self.end;
    }
}

/// Layout box of a node relative to its offset parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetBox {
    pub offset_left: i32,
    pub offset_top: i32,
    pub scroll_left: i32,
    pub scroll_top: i32,
    pub offset_parent: Option<NodeId>,
}

/// Page coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        ScreenPoint { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        ScreenPoint {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Offset-parent geometry.
pub trait Layout {
    fn offset_box(&self, node: NodeId) -> Option<OffsetBox>;

    /// Scroll position of the document element.
    fn document_scroll_top(&self) -> i32 {
        0
    }
}

/// Node/offset selection ranges.
pub trait RangeSelectionApi: Layout {
    /// Node holding the selection anchor.
    fn anchor_node(&self) -> Option<NodeId>;

    /// First range of the selection.
    fn first_range(&self) -> Option<TextRange>;

    /// Text content of a node. `None` for nodes without character data.
    fn node_text(&self, node: NodeId) -> Option<String>;

    /// Replace the visible selection with `range`. Returns false if the range
    /// does not fit the node.
    fn select(&mut self, range: TextRange) -> bool;

    /// Replace the selection with literal markup; the caret ends up after it.
    fn insert_markup(&mut self, markup: &str) -> bool;

    /// Replace the selection with an element node; the caret ends up after it.
    fn insert_element(&mut self, element: &Element) -> bool;

    /// Insert a zero-size marker at `offset` of `node`.
    fn insert_marker(&mut self, node: NodeId, offset: usize) -> Option<NodeId>;

    fn remove_marker(&mut self, marker: NodeId);
}

/// Legacy text ranges with document-wide offsets.
pub trait TextRangeApi: Layout {
    /// Range over the current selection (`document.selection.createRange()`).
    fn create_range(&self) -> LegacyRange;

    /// Node containing the end point of `range`.
    fn parent_element(&self, range: &LegacyRange) -> Option<NodeId>;

    /// Document offset of the first char of `node` (`moveToElementText`).
    fn element_start(&self, node: NodeId) -> Option<usize>;

    fn element_text(&self, node: NodeId) -> Option<String>;

    /// Move the start point by `units` chars, clamped to the document.
    /// Returns how far it actually moved.
    fn move_start(&self, range: &mut LegacyRange, units: isize) -> isize;

    /// Move the end point by `units` chars, clamped to the document.
    fn move_end(&self, range: &mut LegacyRange, units: isize) -> isize;

    fn range_text(&self, range: &LegacyRange) -> String;

    fn select(&mut self, range: &LegacyRange);

    /// Clear the range text and paste markup in its place.
    fn paste_markup(&mut self, range: &LegacyRange, markup: &str) -> bool;

    /// Clear the range text and put an element in its place.
    fn paste_element(&mut self, range: &LegacyRange, element: &Element) -> bool;
}

/// An editable surface and the selection APIs it supports.
pub trait EditableSurface {
    fn range_selection(&mut self) -> Option<&mut dyn RangeSelectionApi> {
        None
    }

    fn text_range_selection(&mut self) -> Option<&mut dyn TextRangeApi> {
        None
    }
}

/// Shared handle to the editor the widget is attached to.
pub type EditorHandle<S> = Rc<RefCell<S>>;

/// Sum offsets up the offset-parent chain starting at `node`.
///
/// When the document is scrolled its scroll position is used for every
/// element in the chain, otherwise each element's own.
pub fn page_offset<L: Layout + ?Sized>(layout: &L, node: NodeId) -> ScreenPoint {
    let doc_scroll = layout.document_scroll_top();
    let mut point = ScreenPoint::default();
    let mut current = Some(node);

    while let Some(id) = current {
        let Some(bx) = layout.offset_box(id) else {
            break;
        };
        let top_scroll = if doc_scroll != 0 { doc_scroll } else { bx.scroll_top };
        point.x += bx.offset_left - bx.scroll_left;
        point.y += bx.offset_top - top_scroll;
        current = bx.offset_parent;
    }

    point
}
