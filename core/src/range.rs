//! Range resolution over the host's selection API.
//!
//! [`RangeResolver`] is the one contract the rest of the widget uses to ask
//! "where is the caret" and "give me chars `[start, end)` of this node". Two
//! back-ends implement it:
//!
//! - [`DomRangeResolver`] over [`RangeSelectionApi`], where offsets are
//!   already node-relative.
//! - [`TextRangeResolver`] over [`TextRangeApi`], where offsets are
//!   document-wide and every span is reached by moving a range relative to
//!   the caret.
//!
//! [`detect`] picks one at construction time. Nothing here caches text or
//! ranges; every call re-reads the live surface.

use crate::candidate::HintValue;
use crate::error::{HintsError, Result};
use crate::surface::{
    page_offset, EditableSurface, EditorHandle, LegacyRange, NodeId, RangeSelectionApi,
    ScreenPoint, TextRange, TextRangeApi,
};
use crate::utils::{char_len, char_slice};
use tracing::trace;

/// Which selection back-end a resolver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Node/offset ranges
    Range,
    /// Legacy document-wide text ranges
    TextRange,
}

/// Text read from a node, plus the range that covers it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extracted {
    pub text: String,
    pub range: Option<TextRange>,
}

impl Extracted {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Uniform caret/range contract over either selection back-end.
pub trait RangeResolver {
    fn backend(&self) -> Backend;

    /// Char offset of the caret within its text node.
    fn caret_offset(&self) -> Result<usize>;

    /// Node holding the caret.
    fn selected_node(&self) -> Result<NodeId>;

    /// Chars `[start, end)` of `node`.
    ///
    /// An unset `start` or a node without text yields empty text and no
    /// range, leaving the visible selection alone. `end` is clamped to the
    /// node length. With `update_visual_selection` the host selection is
    /// moved onto the range.
    fn extract_range(
        &self,
        node: NodeId,
        start: Option<usize>,
        end: usize,
        update_visual_selection: bool,
    ) -> Result<Extracted>;

    /// Page coordinates of the caret.
    fn cursor_screen_position(&self) -> Result<ScreenPoint>;

    /// Delete `range` and insert `value` in its place, caret after it.
    fn replace_range(&self, range: &TextRange, value: &HintValue) -> Result<()>;
}

/// Probe the surface once and return the resolver for the best available
/// back-end. `preferred` forces a back-end, which must still be available.
pub fn detect<S: EditableSurface + 'static>(
    editor: &EditorHandle<S>,
    preferred: Option<Backend>,
) -> Result<Box<dyn RangeResolver>> {
    let (has_range, has_text_range) = {
        let mut surface = editor.borrow_mut();
        (
            surface.range_selection().is_some(),
            surface.text_range_selection().is_some(),
        )
    };

    let backend = match preferred {
        Some(Backend::Range) if has_range => Backend::Range,
        Some(Backend::TextRange) if has_text_range => Backend::TextRange,
        Some(_) => return Err(HintsError::UnsupportedEnvironment),
        None if has_range => Backend::Range,
        None if has_text_range => Backend::TextRange,
        None => return Err(HintsError::UnsupportedEnvironment),
    };
    trace!(?backend, "selection back-end selected");

    Ok(match backend {
        Backend::Range => Box::new(DomRangeResolver::new(editor.clone())),
        Backend::TextRange => Box::new(TextRangeResolver::new(editor.clone())),
    })
}

/// Resolver over node/offset selection ranges.
pub struct DomRangeResolver<S> {
    editor: EditorHandle<S>,
}

impl<S: EditableSurface> DomRangeResolver<S> {
    pub fn new(editor: EditorHandle<S>) -> Self {
        Self { editor }
    }

    fn with_api<T>(&self, f: impl FnOnce(&mut dyn RangeSelectionApi) -> Result<T>) -> Result<T> {
        let mut surface = self.editor.borrow_mut();
        let api = surface
            .range_selection()
            .ok_or(HintsError::UnsupportedEnvironment)?;
        f(api)
    }
}

impl<S: EditableSurface> RangeResolver for DomRangeResolver<S> {
    fn backend(&self) -> Backend {
        Backend::Range
    }

    fn caret_offset(&self) -> Result<usize> {
        self.with_api(|api| {
            api.first_range()
                .map(|r| r.start)
                .ok_or(HintsError::UnsupportedEnvironment)
        })
    }

    fn selected_node(&self) -> Result<NodeId> {
        self.with_api(|api| api.anchor_node().ok_or(HintsError::UnsupportedEnvironment))
    }

    fn extract_range(
        &self,
        node: NodeId,
        start: Option<usize>,
        end: usize,
        update_visual_selection: bool,
    ) -> Result<Extracted> {
        let Some(start) = start else {
            return Ok(Extracted::empty());
        };
        self.with_api(|api| {
            let data = match api.node_text(node) {
                Some(data) if !data.is_empty() => data,
                _ => return Ok(Extracted::empty()),
            };
            let end = end.min(char_len(&data));
            let start = start.min(end);
            let range = TextRange { node, start, end };
            if update_visual_selection {
                api.select(range);
            }
            Ok(Extracted {
                text: char_slice(&data, start, end).to_string(),
                range: Some(range),
            })
        })
    }

    fn cursor_screen_position(&self) -> Result<ScreenPoint> {
        self.with_api(|api| {
            let caret = api.first_range().ok_or(HintsError::UnsupportedEnvironment)?;
            let marker = api
                .insert_marker(caret.node, caret.end)
                .ok_or(HintsError::UnsupportedEnvironment)?;
            let point = page_offset(&*api, marker);
            api.remove_marker(marker);
            Ok(point)
        })
    }

    fn replace_range(&self, range: &TextRange, value: &HintValue) -> Result<()> {
        self.with_api(|api| {
            if !api.select(*range) {
                return Err(HintsError::stale(Some(range.node), range.start, range.end));
            }
            let inserted = match value {
                HintValue::Markup(markup) => api.insert_markup(markup),
                HintValue::Element(element) => api.insert_element(element),
            };
            if inserted {
                Ok(())
            } else {
                Err(HintsError::stale(Some(range.node), range.start, range.end))
            }
        })
    }
}

/// Resolver over legacy document-wide text ranges.
pub struct TextRangeResolver<S> {
    editor: EditorHandle<S>,
}

impl<S: EditableSurface> TextRangeResolver<S> {
    pub fn new(editor: EditorHandle<S>) -> Self {
        Self { editor }
    }

    fn with_api<T>(&self, f: impl FnOnce(&mut dyn TextRangeApi) -> Result<T>) -> Result<T> {
        let mut surface = self.editor.borrow_mut();
        let api = surface
            .text_range_selection()
            .ok_or(HintsError::UnsupportedEnvironment)?;
        f(api)
    }
}

/// Node holding the caret and the caret's offset inside it.
fn legacy_caret(api: &dyn TextRangeApi) -> Result<(NodeId, usize)> {
    let range = api.create_range();
    let node = api
        .parent_element(&range)
        .ok_or(HintsError::UnsupportedEnvironment)?;
    let node_start = api
        .element_start(node)
        .ok_or(HintsError::UnsupportedEnvironment)?;
    Ok((node, range.end.saturating_sub(node_start)))
}

impl<S: EditableSurface> RangeResolver for TextRangeResolver<S> {
    fn backend(&self) -> Backend {
        Backend::TextRange
    }

    fn caret_offset(&self) -> Result<usize> {
        self.with_api(|api| legacy_caret(&*api).map(|(_, offset)| offset))
    }

    fn selected_node(&self) -> Result<NodeId> {
        self.with_api(|api| legacy_caret(&*api).map(|(node, _)| node))
    }

    fn extract_range(
        &self,
        node: NodeId,
        start: Option<usize>,
        end: usize,
        update_visual_selection: bool,
    ) -> Result<Extracted> {
        let Some(start) = start else {
            return Ok(Extracted::empty());
        };
        self.with_api(|api| {
            let data = match api.element_text(node) {
                Some(data) if !data.is_empty() => data,
                _ => return Ok(Extracted::empty()),
            };
            let end = end.min(char_len(&data));
            let start = start.min(end);
            let (caret_node, caret) = legacy_caret(&*api)?;
            if caret_node != node {
                return Err(HintsError::stale(Some(node), start, end));
            }

            // Only relative moves are possible: bring the end point from the
            // caret to `end`, collapse, then pull the start back by the span.
            let mut range = api.create_range();
            range.collapse_to_end();
            api.move_end(&mut range, end as isize - caret as isize);
            range.collapse_to_end();
            api.move_start(&mut range, -((end - start) as isize));

            let text = api.range_text(&range);
            if update_visual_selection {
                api.select(&range);
            }
            Ok(Extracted {
                text,
                range: Some(TextRange { node, start, end }),
            })
        })
    }

    fn cursor_screen_position(&self) -> Result<ScreenPoint> {
        // No zero-size marker here; the containing node's box is the best
        // this API offers.
        self.with_api(|api| {
            let (node, _) = legacy_caret(&*api)?;
            Ok(page_offset(&*api, node))
        })
    }

    fn replace_range(&self, range: &TextRange, value: &HintValue) -> Result<()> {
        self.with_api(|api| {
            let stale = || HintsError::stale(Some(range.node), range.start, range.end);
            let node_start = api.element_start(range.node).ok_or_else(stale)?;
            let expected = LegacyRange {
                start: node_start + range.start,
                end: node_start + range.end,
            };
            let selected = api.create_range();
            if selected != expected {
                return Err(stale());
            }
            let pasted = match value {
                HintValue::Markup(markup) => api.paste_markup(&selected, markup),
                HintValue::Element(element) => api.paste_element(&selected, element),
            };
            if pasted { Ok(()) } else { Err(stale()) }
        })
    }
}
