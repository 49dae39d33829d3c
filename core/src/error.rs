//! Error types for the hints widget.
//!
//! Only three conditions are errors: a host without any usable selection
//! primitive, a widget built without an editor, and a text range that no
//! longer matches live content when a candidate is committed. Everything
//! else (empty keyword, caret at offset 0, no matching candidates) is normal
//! control flow and resolves to the idle state.

use crate::surface::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintsError {
    /// The host exposes neither the range selection API nor the legacy
    /// text-range API.
    #[error("Implementation not supported: no usable selection API")]
    UnsupportedEnvironment,

    /// Missing editor target or an unusable option at construction time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The span `[start, end)` of `node` no longer corresponds to the typed
    /// keyword.
    #[error("Stale range: [{start}, {end}) in node {node:?} no longer matches live content")]
    StaleRange {
        node: Option<NodeId>,
        start: usize,
        end: usize,
    },

    /// Config or hint list could not be read or parsed.
    #[error("Config load error: {0}")]
    Config(String),
}

impl HintsError {
    pub(crate) fn stale(node: Option<NodeId>, start: usize, end: usize) -> Self {
        HintsError::StaleRange { node, start, end }
    }

    /// Whether the widget can keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HintsError::StaleRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, HintsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_stale_range_is_recoverable() {
        assert!(HintsError::stale(None, 1, 3).is_recoverable());
        assert!(!HintsError::UnsupportedEnvironment.is_recoverable());
        assert!(!HintsError::Configuration("editor".into()).is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = HintsError::Configuration("Editor is undefined".to_string());
        assert_eq!(err.to_string(), "Configuration error: Editor is undefined");

        let err = HintsError::stale(Some(NodeId(4)), 6, 8);
        assert!(err.to_string().contains("[6, 8)"));
    }
}
