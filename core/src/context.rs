//! Menu view for the host's renderer.
//!
//! `MenuView` is a plain data container with public fields. After each key
//! event or tick the host reads it to draw (or hide) the suggestion menu;
//! nothing in it calls back into the widget.

use crate::candidate::Candidate;
use crate::surface::ScreenPoint;

/// One rendered menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Position of the candidate in the configured hint list
    pub index: usize,

    /// Display text
    pub text: String,
}

/// Render state of the suggestion menu.
///
/// # Fields
///
/// - `visible`: whether the menu box is shown
/// - `class_name`: style class of the menu container
/// - `entries`: rows in source order
/// - `highlighted`: highlighted row, `Some` exactly when the menu is visible
/// - `scroll_top` / `visible_rows`: viewport over `entries`
/// - `position`: page coordinates of the box's top-left corner
/// - `committed`: last committed candidate (consume with `take_committed`)
#[derive(Debug, Clone, Default)]
pub struct MenuView {
    pub visible: bool,

    pub class_name: String,

    pub entries: Vec<MenuEntry>,

    pub highlighted: Option<usize>,

    /// First row inside the viewport
    pub scroll_top: usize,

    pub visible_rows: usize,

    pub position: ScreenPoint,

    pub committed: Option<Candidate>,
}

impl MenuView {
    pub fn new<T: Into<String>>(class_name: T) -> Self {
        Self {
            class_name: class_name.into(),
            ..Default::default()
        }
    }

    /// Hide the menu and drop its rows. Does NOT clear `committed`.
    pub fn clear(&mut self) {
        self.visible = false;
        self.entries.clear();
        self.highlighted = None;
        self.scroll_top = 0;
    }

    /// Take the committed candidate, leaving `None`.
    pub fn take_committed(&mut self) -> Option<Candidate> {
        self.committed.take()
    }

    pub fn highlighted_entry(&self) -> Option<&MenuEntry> {
        self.highlighted.and_then(|i| self.entries.get(i))
    }

    /// Rows inside the viewport.
    pub fn visible_entries(&self) -> &[MenuEntry] {
        let start = self.scroll_top.min(self.entries.len());
        let end = (start + self.visible_rows.max(1)).min(self.entries.len());
        &self.entries[start..end]
    }
}
