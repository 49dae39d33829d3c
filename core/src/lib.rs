//! editablehints-core
//!
//! Inline mention/autocomplete for editable text surfaces. Typing the
//! trigger character followed by a keyword opens a suggestion menu at the
//! caret; picking a candidate replaces exactly the typed span.
//!
//! Public API:
//! - `EditableHints` - Widget attached to one surface, driven by key events
//! - `HintsConfig` - Hint list, trigger and menu options
//! - `RangeResolver` - Caret/range contract over the host's selection API
//! - `EditableSurface` - Capabilities a host surface exposes
//! - `Document` - In-memory reference surface
//! - `MenuView` - Render state of the suggestion menu
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{HintsError, Result};

pub mod surface;
pub use surface::{
    EditableSurface, EditorHandle, Layout, LegacyRange, NodeId, OffsetBox, RangeSelectionApi,
    ScreenPoint, TextRange, TextRangeApi,
};

pub mod document;
pub use document::{Capabilities, Document};

pub mod range;
pub use range::{Backend, DomRangeResolver, Extracted, RangeResolver, TextRangeResolver};

pub mod candidate;
pub use candidate::{Candidate, Element, HintEntry, HintList, HintValue};

pub mod filter;
pub use filter::filter;

pub mod context;
pub use context::{MenuEntry, MenuView};

pub mod session;
pub use session::{HintSession, HintState};

pub mod presenter;
pub use presenter::{Direction, MenuPresenter};

pub mod detector;
pub use detector::{Detection, TriggerDetector};

pub mod replace;

pub mod hints_engine;
pub use hints_engine::{EditableHints, HintsBuilder, KeyEvent, KeyResult, Task};

/// Widget configuration.
///
/// Option keys also accept their camelCase names (`className`,
/// `hintsBoxOffsetX`, `hintsBoxOffsetY`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HintsConfig {
    /// Char that opens a hint span
    pub trigger: char,

    /// Style class of the menu container
    #[serde(alias = "className")]
    pub class_name: String,

    /// Pixel offset of the menu from the caret
    #[serde(alias = "hintsBoxOffsetX")]
    pub hints_box_offset_x: i32,
    #[serde(alias = "hintsBoxOffsetY")]
    pub hints_box_offset_y: i32,

    /// Menu rows shown before scrolling
    #[serde(alias = "visibleRows")]
    pub visible_rows: usize,

    /// Candidates offered in the menu, in display order
    pub hints: Vec<Candidate>,
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            trigger: '@',
            class_name: "editablehints".to_string(),
            hints_box_offset_x: 0,
            hints_box_offset_y: 0,
            visible_rows: 5,
            hints: Vec::new(),
        }
    }
}

impl HintsConfig {
    /// Default options with the given hint list.
    pub fn with_hints(hints: Vec<Candidate>) -> Self {
        Self {
            hints,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| HintsError::Config(format!("read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .map_err(|e| HintsError::Config(format!("write {}: {}", path.display(), e)))
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| HintsError::Config(e.to_string()))
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| HintsError::Config(e.to_string()))
    }

    /// Replace the hint list with one read from JSON.
    pub fn load_hints_json(&mut self, json: &str) -> Result<()> {
        self.hints = Candidate::list_from_json(json)?;
        Ok(())
    }

    /// Check options that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.trigger.is_whitespace() || self.trigger.is_control() {
            return Err(HintsError::Configuration(format!(
                "trigger must be a visible character, got {:?}",
                self.trigger
            )));
        }
        Ok(())
    }
}

/// Utility helpers.
///
/// Every offset in this crate counts chars; these convert to byte positions.
pub mod utils {
    /// Length in chars.
    pub fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    /// Byte index of char `offset`, clamped to the end of `s`.
    pub fn byte_index(s: &str, offset: usize) -> usize {
        s.char_indices().nth(offset).map_or(s.len(), |(i, _)| i)
    }

    /// Chars `[start, end)` of `s`, clamped.
    pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
        let end = byte_index(s, end);
        let start = byte_index(s, start).min(end);
        &s[start..end]
    }
}
