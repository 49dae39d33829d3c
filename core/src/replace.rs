//! Replacement of the typed trigger+keyword span.

use crate::candidate::HintValue;
use crate::error::{HintsError, Result};
use crate::range::RangeResolver;
use tracing::debug;

/// Replace chars `[trigger_offset, caret_offset)` of the caret's node with
/// `value`.
///
/// The span is resolved again from live content and must still begin with
/// `trigger`. If it cannot be resolved nothing is inserted and
/// [`HintsError::StaleRange`] is returned.
pub fn replace(
    resolver: &dyn RangeResolver,
    trigger_offset: Option<usize>,
    caret_offset: usize,
    trigger: char,
    value: &HintValue,
) -> Result<()> {
    let node = resolver.selected_node()?;
    let stale = || HintsError::stale(Some(node), trigger_offset.unwrap_or(0), caret_offset);

    let start = match trigger_offset {
        Some(start) if start < caret_offset => start,
        _ => return Err(stale()),
    };

    let extracted = resolver.extract_range(node, Some(start), caret_offset, true)?;
    let range = match extracted.range {
        Some(range) if range.end == caret_offset && range.start == start => range,
        _ => return Err(stale()),
    };
    if !extracted.text.starts_with(trigger) {
        return Err(stale());
    }

    debug!(node = ?node, start, end = caret_offset, "replacing hint span");
    resolver.replace_range(&range, value)
}
