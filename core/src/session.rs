//! Hint session state.
//!
//! `HintSession` tracks what the widget believes about the text between key
//! events: whether a hint span is active, where its trigger character sits,
//! and the filtered candidates with their highlight cursor.
//!
//! Outside a running detection, `is_hinting()` holds exactly when the trigger
//! offset is set.

use crate::candidate::{HintEntry, HintList};
use crate::context::{MenuEntry, MenuView};

/// Current state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HintState {
    /// No active hint span
    #[default]
    Idle,
    /// Caret is inside a hint span and the menu is shown
    Hinting,
}

/// Hint session combining state, trigger hypothesis and candidates.
#[derive(Debug, Clone)]
pub struct HintSession {
    state: HintState,

    /// Char offset of the trigger in the caret's text node
    trigger_offset: Option<usize>,

    /// Filtered candidates for the current keyword
    candidates: HintList,
}

impl HintSession {
    pub fn new() -> Self {
        Self::with_visible_rows(5)
    }

    /// Create a session whose menu shows `visible_rows` entries at once.
    pub fn with_visible_rows(visible_rows: usize) -> Self {
        Self {
            state: HintState::Idle,
            trigger_offset: None,
            candidates: HintList::with_visible_rows(visible_rows),
        }
    }

    pub fn state(&self) -> HintState {
        self.state
    }

    pub fn is_hinting(&self) -> bool {
        self.state == HintState::Hinting
    }

    pub fn trigger_offset(&self) -> Option<usize> {
        self.trigger_offset
    }

    /// Record a trigger hypothesis without changing state.
    pub fn set_trigger_offset(&mut self, offset: Option<usize>) {
        self.trigger_offset = offset;
    }

    pub fn candidates(&self) -> &HintList {
        &self.candidates
    }

    pub fn candidates_mut(&mut self) -> &mut HintList {
        &mut self.candidates
    }

    /// Enter Hinting with a fresh set of entries, first one highlighted.
    pub fn begin_hinting(&mut self, entries: Vec<HintEntry>) {
        self.candidates.set_entries(entries);
        self.state = HintState::Hinting;
    }

    /// Return to Idle. Safe to call any number of times.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.trigger_offset = None;
        self.state = HintState::Idle;
    }

    /// Copy candidate state into the view. Visibility and position are the
    /// presenter's business.
    pub fn sync_to_view(&self, view: &mut MenuView) {
        view.entries.clear();
        view.entries.extend(self.candidates.entries().iter().map(|e| MenuEntry {
            index: e.index,
            text: e.candidate.text.clone(),
        }));
        view.highlighted = if self.candidates.is_empty() {
            None
        } else {
            Some(self.candidates.cursor())
        };
        view.scroll_top = self.candidates.scroll_top();
        view.visible_rows = self.candidates.visible_rows();
    }
}

impl Default for HintSession {
    fn default() -> Self {
        Self::new()
    }
}
