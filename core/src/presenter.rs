//! Menu presenter.
//!
//! Turns session state into a [`MenuView`]: shows the filtered candidates at
//! the caret, moves the highlight, and commits the highlighted candidate.

use crate::candidate::{Candidate, HintEntry};
use crate::context::MenuView;
use crate::error::Result;
use crate::range::RangeResolver;
use crate::replace::replace;
use crate::session::HintSession;
use tracing::{debug, trace};

/// Highlight movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Positions and drives the suggestion menu.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuPresenter {
    /// Pixel offset added to the caret position
    offset_x: i32,
    offset_y: i32,
}

impl MenuPresenter {
    pub fn new(offset_x: i32, offset_y: i32) -> Self {
        Self { offset_x, offset_y }
    }

    /// Show `entries` at the caret with the first one highlighted. An empty
    /// list hides the menu instead.
    pub fn render(
        &self,
        session: &mut HintSession,
        entries: Vec<HintEntry>,
        resolver: &dyn RangeResolver,
        view: &mut MenuView,
    ) -> Result<()> {
        if entries.is_empty() {
            self.hide(session, view);
            return Ok(());
        }

        let position = resolver
            .cursor_screen_position()?
            .offset(self.offset_x, self.offset_y);

        session.begin_hinting(entries);
        session.sync_to_view(view);
        view.position = position;
        view.visible = true;
        trace!(rows = view.entries.len(), x = position.x, y = position.y, "menu shown");
        Ok(())
    }

    /// Hide the menu and reset the session to Idle.
    pub fn hide(&self, session: &mut HintSession, view: &mut MenuView) {
        session.clear();
        view.clear();
    }

    /// Move the highlight one row. Returns true if it moved.
    pub fn move_highlight(
        &self,
        session: &mut HintSession,
        view: &mut MenuView,
        direction: Direction,
    ) -> bool {
        if !session.is_hinting() {
            return false;
        }
        let list = session.candidates_mut();
        let moved = match direction {
            Direction::Up => list.cursor_up(),
            Direction::Down => list.cursor_down(),
        };
        if moved {
            session.sync_to_view(view);
        }
        moved
    }

    /// Replace the typed span with the highlighted candidate and hide.
    ///
    /// The menu is hidden whether or not the replacement succeeds. On success
    /// the candidate is also recorded in `view.committed`.
    pub fn commit_highlighted(
        &self,
        session: &mut HintSession,
        resolver: &dyn RangeResolver,
        trigger: char,
        view: &mut MenuView,
    ) -> Result<Option<Candidate>> {
        if !session.is_hinting() {
            return Ok(None);
        }
        let Some(entry) = session.candidates().highlighted().cloned() else {
            self.hide(session, view);
            return Ok(None);
        };

        let trigger_offset = session.trigger_offset();
        let result = resolver
            .caret_offset()
            .and_then(|caret| replace(resolver, trigger_offset, caret, trigger, &entry.candidate.value));
        self.hide(session, view);
        result?;

        debug!(index = entry.index, text = %entry.candidate.text, "hint committed");
        view.committed = Some(entry.candidate.clone());
        Ok(Some(entry.candidate))
    }
}
