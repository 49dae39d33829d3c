//! Trigger detection.
//!
//! Runs after each qualifying key-up and decides whether the caret sits in a
//! hint span. When the session is Idle the char just before the caret is
//! taken as the trigger hypothesis; while Hinting the recorded trigger is
//! kept, so the keyword grows and shrinks with the caret.

use crate::candidate::Candidate;
use crate::context::MenuView;
use crate::error::Result;
use crate::filter::filter_entries;
use crate::presenter::MenuPresenter;
use crate::range::RangeResolver;
use crate::session::HintSession;
use tracing::debug;

/// Outcome of one detection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// No hint span at the caret; the menu is hidden
    Idle,
    /// Caret is in a hint span
    Hinting { keyword: String, matches: usize },
}

/// Idle/Hinting state machine for one trigger character.
#[derive(Debug, Clone, Copy)]
pub struct TriggerDetector {
    trigger: char,
}

impl TriggerDetector {
    pub fn new(trigger: char) -> Self {
        Self { trigger }
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    /// Re-read the caret and keyword, filter `hints`, and show or hide the
    /// menu accordingly.
    pub fn detect(
        &self,
        session: &mut HintSession,
        resolver: &dyn RangeResolver,
        hints: &[Candidate],
        presenter: &MenuPresenter,
        view: &mut MenuView,
    ) -> Result<Detection> {
        let caret = resolver.caret_offset()?;
        let trigger = if !session.is_hinting() && session.trigger_offset().is_none() {
            caret.checked_sub(1)
        } else {
            session.trigger_offset()
        };

        // Record the hypothesis only once the range could be read.
        let node = resolver.selected_node()?;
        let extracted = resolver.extract_range(node, trigger, caret, false)?;
        session.set_trigger_offset(trigger);

        let keyword = match extracted.text.strip_prefix(self.trigger) {
            Some(keyword) if caret > 0 => keyword,
            _ => {
                presenter.hide(session, view);
                debug!(caret, "detection idle");
                return Ok(Detection::Idle);
            }
        };

        let entries = filter_entries(keyword, hints);
        let matches = entries.len();
        presenter.render(session, entries, resolver, view)?;

        let detection = if session.is_hinting() {
            Detection::Hinting { keyword: keyword.to_string(), matches }
        } else {
            Detection::Idle
        };
        debug!(?detection, trigger = ?session.trigger_offset(), caret, "detection finished");
        Ok(detection)
    }
}
