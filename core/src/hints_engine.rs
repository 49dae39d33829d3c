//! Hints widget with key event processing.
//!
//! `EditableHints` attaches to one editable surface. The host forwards key
//! events to [`EditableHints::key_down`] and [`EditableHints::key_up`] and
//! drives deferred work with [`EditableHints::tick`]; after each call it reads
//! [`EditableHints::view`] to draw the menu.
//!
//! ```
//! use editablehints_core::{Candidate, Document, EditableHints, HintsConfig, KeyEvent};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let editor = Rc::new(RefCell::new(Document::new()));
//! let config = HintsConfig::with_hints(vec![Candidate::plain("alice")]);
//! let mut hints = EditableHints::builder(config).editor(editor.clone()).build().unwrap();
//!
//! editor.borrow_mut().apply_native(&KeyEvent::Char('@'));
//! hints.key_up(KeyEvent::Char('@'));
//! hints.tick().unwrap();
//! assert!(hints.view().visible);
//! ```

use crate::context::MenuView;
use crate::detector::{Detection, TriggerDetector};
use crate::error::{HintsError, Result};
use crate::presenter::{Direction, MenuPresenter};
use crate::range::{self, Backend, RangeResolver};
use crate::session::HintSession;
use crate::surface::{EditableSurface, EditorHandle};
use crate::{Candidate, HintsConfig};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Key event types the widget can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Character input
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    /// Up arrow key (highlight up)
    Up,
    /// Down arrow key (highlight down)
    Down,
    Home,
    End,
    /// Enter/Return key (commit highlighted candidate)
    Enter,
    /// Escape key (close menu)
    Escape,
    Tab,
}

impl KeyEvent {
    /// Keys that never schedule detection and are intercepted while hinting.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            KeyEvent::Left
                | KeyEvent::Right
                | KeyEvent::Up
                | KeyEvent::Down
                | KeyEvent::Enter
                | KeyEvent::Escape
        )
    }

    /// Parse a key name such as `up`, `enter` or `esc`. A single char names
    /// itself.
    pub fn from_name(name: &str) -> Option<KeyEvent> {
        let key = match name.to_ascii_lowercase().as_str() {
            "backspace" | "bs" => KeyEvent::Backspace,
            "delete" | "del" => KeyEvent::Delete,
            "left" => KeyEvent::Left,
            "right" => KeyEvent::Right,
            "up" => KeyEvent::Up,
            "down" => KeyEvent::Down,
            "home" => KeyEvent::Home,
            "end" => KeyEvent::End,
            "enter" | "return" => KeyEvent::Enter,
            "escape" | "esc" => KeyEvent::Escape,
            "tab" => KeyEvent::Tab,
            "space" => KeyEvent::Char(' '),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => KeyEvent::Char(ch),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Result of processing a key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was consumed; the host must suppress its default action
    Handled,
    /// Key was not handled (apply the native effect)
    NotHandled,
}

/// Deferred work queued by key-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Detect,
}

/// Builder for [`EditableHints`].
pub struct HintsBuilder<S> {
    config: HintsConfig,
    editor: Option<EditorHandle<S>>,
    backend: Option<Backend>,
}

impl<S: EditableSurface + 'static> HintsBuilder<S> {
    /// Target surface. Required.
    pub fn editor(mut self, editor: EditorHandle<S>) -> Self {
        self.editor = Some(editor);
        self
    }

    /// Force a selection back-end instead of probing for the best one.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> Result<EditableHints<S>> {
        let editor = self
            .editor
            .ok_or_else(|| HintsError::Configuration("Editor is undefined".to_string()))?;
        self.config.validate()?;
        let resolver = range::detect(&editor, self.backend)?;
        debug!(
            backend = ?resolver.backend(),
            hints = self.config.hints.len(),
            trigger = %self.config.trigger,
            "hints widget attached"
        );

        Ok(EditableHints {
            session: HintSession::with_visible_rows(self.config.visible_rows),
            view: MenuView::new(self.config.class_name.clone()),
            detector: TriggerDetector::new(self.config.trigger),
            presenter: MenuPresenter::new(
                self.config.hints_box_offset_x,
                self.config.hints_box_offset_y,
            ),
            tasks: VecDeque::new(),
            resolver,
            editor,
            config: self.config,
        })
    }
}

/// Inline hints widget attached to one editable surface.
pub struct EditableHints<S> {
    editor: EditorHandle<S>,
    config: HintsConfig,
    resolver: Box<dyn RangeResolver>,
    detector: TriggerDetector,
    presenter: MenuPresenter,

    /// Session state
    session: HintSession,

    /// Render state for the host
    view: MenuView,

    tasks: VecDeque<Task>,
}

impl<S: EditableSurface + 'static> EditableHints<S> {
    pub fn builder(config: HintsConfig) -> HintsBuilder<S> {
        HintsBuilder {
            config,
            editor: None,
            backend: None,
        }
    }

    /// Attach to `editor`. Fails with a configuration error when it is `None`.
    pub fn new(editor: Option<EditorHandle<S>>, config: HintsConfig) -> Result<Self> {
        let mut builder = Self::builder(config);
        builder.editor = editor;
        builder.build()
    }

    pub fn editor(&self) -> &EditorHandle<S> {
        &self.editor
    }

    pub fn config(&self) -> &HintsConfig {
        &self.config
    }

    pub fn backend(&self) -> Backend {
        self.resolver.backend()
    }

    pub fn session(&self) -> &HintSession {
        &self.session
    }

    pub fn view(&self) -> &MenuView {
        &self.view
    }

    pub fn is_hinting(&self) -> bool {
        self.session.is_hinting()
    }

    /// Last committed candidate, if any, consumed.
    pub fn take_committed(&mut self) -> Option<Candidate> {
        self.view.take_committed()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Process a key-down event.
    ///
    /// While hinting, arrows, Enter and Escape are consumed and the host must
    /// not apply their native effect. Everything else passes through.
    pub fn key_down(&mut self, key: KeyEvent) -> Result<KeyResult> {
        if !self.session.is_hinting() {
            return Ok(KeyResult::NotHandled);
        }

        match key {
            KeyEvent::Left | KeyEvent::Right => {}
            KeyEvent::Up => {
                self.presenter
                    .move_highlight(&mut self.session, &mut self.view, Direction::Up);
            }
            KeyEvent::Down => {
                self.presenter
                    .move_highlight(&mut self.session, &mut self.view, Direction::Down);
            }
            KeyEvent::Enter => self.commit()?,
            KeyEvent::Escape => {
                debug!("hinting cancelled");
                self.hide();
            }
            _ => return Ok(KeyResult::NotHandled),
        }
        Ok(KeyResult::Handled)
    }

    /// Process a key-up event: queue a detection for non-navigation keys.
    pub fn key_up(&mut self, key: KeyEvent) {
        if !key.is_navigation() {
            self.tasks.push_back(Task::Detect);
        }
    }

    /// Run every queued task. Returns how many ran.
    pub fn tick(&mut self) -> Result<usize> {
        let mut ran = 0;
        while let Some(task) = self.tasks.pop_front() {
            match task {
                Task::Detect => {
                    self.detect_now()?;
                }
            }
            ran += 1;
        }
        Ok(ran)
    }

    /// Run detection immediately against the live surface.
    pub fn detect_now(&mut self) -> Result<Detection> {
        let result = self.detector.detect(
            &mut self.session,
            &*self.resolver,
            &self.config.hints,
            &self.presenter,
            &mut self.view,
        );
        match result {
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "detection aborted");
                self.hide();
                Ok(Detection::Idle)
            }
            Err(err) => {
                warn!(error = %err, "detection failed");
                self.hide();
                Err(err)
            }
            ok => ok,
        }
    }

    /// Close the menu and reset to Idle.
    pub fn hide(&mut self) {
        self.presenter.hide(&mut self.session, &mut self.view);
    }

    fn commit(&mut self) -> Result<()> {
        let result = self.presenter.commit_highlighted(
            &mut self.session,
            &*self.resolver,
            self.detector.trigger(),
            &mut self.view,
        );
        match result {
            Ok(_) => Ok(()),
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "replacement aborted");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
