// core/tests/scenarios.rs
//
// End-to-end tests driving EditableHints against the in-memory Document.
//
// Tests cover:
// - Typing a trigger and keyword, navigation, commit and cancel
// - Hinting broken by deleting the trigger
// - Same behavior on the legacy text-range back-end
// - Element insertion followed by a second mention
// - Recovery from a stale range at commit time

use editablehints_core::{
    Backend, Candidate, Capabilities, Document, EditableHints, Element, HintsConfig, KeyEvent,
    KeyResult,
};
use std::cell::RefCell;
use std::rc::Rc;

struct Harness {
    editor: Rc<RefCell<Document>>,
    hints: EditableHints<Document>,
}

impl Harness {
    fn new(text: &str, backend: Backend, hints: Vec<Candidate>) -> Self {
        let capabilities = match backend {
            Backend::Range => Capabilities::RANGE_ONLY,
            Backend::TextRange => Capabilities::TEXT_RANGE_ONLY,
        };
        let editor = Rc::new(RefCell::new(
            Document::with_text(text).with_capabilities(capabilities),
        ));
        let hints = EditableHints::builder(HintsConfig::with_hints(hints))
            .editor(editor.clone())
            .build()
            .expect("widget should attach");
        assert_eq!(hints.backend(), backend);
        Harness { editor, hints }
    }

    /// Key-down, native effect unless suppressed, key-up, then run the queue.
    fn press(&mut self, key: KeyEvent) -> KeyResult {
        let result = self.hints.key_down(key).unwrap();
        if result == KeyResult::NotHandled {
            self.editor.borrow_mut().apply_native(&key);
        }
        self.hints.key_up(key);
        self.hints.tick().unwrap();
        result
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(KeyEvent::Char(ch));
        }
    }

    fn menu(&self) -> Vec<String> {
        self.hints.view().entries.iter().map(|e| e.text.clone()).collect()
    }

    fn highlighted(&self) -> Option<String> {
        self.hints.view().highlighted_entry().map(|e| e.text.clone())
    }

    fn text(&self) -> String {
        self.editor.borrow().text()
    }
}

fn people() -> Vec<Candidate> {
    vec![
        Candidate::plain("alice"),
        Candidate::plain("bob"),
        Candidate::plain("anna"),
    ]
}

const BACKENDS: [Backend; 2] = [Backend::Range, Backend::TextRange];

/// "hello " with `@a` typed after it.
fn scenario_one(backend: Backend) -> Harness {
    let mut h = Harness::new("hello ", backend, people());
    h.type_text("@a");
    h
}

#[test]
fn test_typing_trigger_and_keyword_opens_menu() {
    for backend in BACKENDS {
        let h = scenario_one(backend);
        assert!(h.hints.is_hinting());
        assert_eq!(h.hints.session().trigger_offset(), Some(6));
        assert_eq!(h.menu(), vec!["alice", "anna"]);
        assert_eq!(h.highlighted().as_deref(), Some("alice"));

        let indices: Vec<usize> = h.hints.view().entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(h.hints.view().class_name, "editablehints");
    }
}

#[test]
fn test_down_moves_highlight_and_stops_at_last() {
    for backend in BACKENDS {
        let mut h = scenario_one(backend);
        assert_eq!(h.press(KeyEvent::Down), KeyResult::Handled);
        assert_eq!(h.highlighted().as_deref(), Some("anna"));
        assert_eq!(h.press(KeyEvent::Down), KeyResult::Handled);
        assert_eq!(h.highlighted().as_deref(), Some("anna"));
        assert_eq!(h.press(KeyEvent::Up), KeyResult::Handled);
        assert_eq!(h.highlighted().as_deref(), Some("alice"));
    }
}

#[test]
fn test_enter_replaces_typed_span() {
    for backend in BACKENDS {
        let mut h = scenario_one(backend);
        h.press(KeyEvent::Down);
        assert_eq!(h.press(KeyEvent::Enter), KeyResult::Handled);

        assert_eq!(h.text(), "hello anna");
        assert_eq!(h.editor.borrow().caret_position(), 10);
        assert!(!h.hints.is_hinting());
        assert_eq!(h.hints.session().trigger_offset(), None);
        assert!(!h.hints.view().visible);
        assert_eq!(
            h.hints.take_committed(),
            Some(Candidate::plain("anna"))
        );
    }
}

#[test]
fn test_escape_cancels_without_editing() {
    for backend in BACKENDS {
        let mut h = scenario_one(backend);
        assert_eq!(h.press(KeyEvent::Escape), KeyResult::Handled);
        assert_eq!(h.text(), "hello @a");
        assert!(!h.hints.is_hinting());
        assert_eq!(h.hints.session().trigger_offset(), None);
        assert!(!h.hints.view().visible);
        assert!(h.hints.take_committed().is_none());
    }
}

#[test]
fn test_deleting_trigger_breaks_hinting() {
    for backend in BACKENDS {
        let mut h = scenario_one(backend);
        {
            let mut doc = h.editor.borrow_mut();
            let node = doc.caret().0;
            doc.set_caret(node, 7);
            doc.backspace();
            assert!(doc.set_caret(node, 7));
        }
        assert_eq!(h.text(), "hello a");
        assert_eq!(h.hints.session().trigger_offset(), Some(6));

        h.hints.key_up(KeyEvent::Backspace);
        h.hints.tick().unwrap();
        assert!(!h.hints.is_hinting());
        assert_eq!(h.hints.session().trigger_offset(), None);
        assert!(!h.hints.view().visible);
    }
}

#[test]
fn test_backspace_widens_keyword() {
    let mut h = Harness::new("", Backend::Range, people());
    h.type_text("@al");
    assert_eq!(h.menu(), vec!["alice"]);
    h.press(KeyEvent::Backspace);
    assert_eq!(h.menu(), vec!["alice", "anna"]);
    h.press(KeyEvent::Backspace);
    assert_eq!(h.menu(), vec!["alice", "bob", "anna"]);
}

#[test]
fn test_unmatched_keyword_hides_menu() {
    for backend in BACKENDS {
        let mut h = Harness::new("", backend, people());
        h.type_text("@z");
        assert!(!h.hints.is_hinting());
        assert!(h.menu().is_empty());
        // Enter is no longer intercepted
        assert_eq!(h.press(KeyEvent::Enter), KeyResult::NotHandled);
        assert_eq!(h.text(), "@z\n");
    }
}

#[test]
fn test_element_value_then_second_mention() {
    for backend in BACKENDS {
        let bob = Element::new("span", "bob")
            .with_attribute("class", "mention")
            .with_attribute("data-user", "2");
        let hints = vec![
            Candidate::plain("alice"),
            Candidate::new("bob", bob.clone()),
            Candidate::plain("anna"),
        ];
        let mut h = Harness::new("hi ", backend, hints);
        h.type_text("@b");
        assert_eq!(h.menu(), vec!["bob"]);
        h.press(KeyEvent::Enter);
        assert_eq!(h.text(), "hi bob");
        assert_eq!(h.editor.borrow().elements(), vec![&bob]);

        // Caret now sits in a fresh text node after the element.
        h.type_text(" @an");
        assert!(h.hints.is_hinting());
        assert_eq!(h.hints.session().trigger_offset(), Some(1));
        assert_eq!(h.menu(), vec!["anna"]);
        h.press(KeyEvent::Enter);

        assert_eq!(h.text(), "hi bob anna");
        assert_eq!(h.editor.borrow().elements().len(), 1);
        assert!(!h.hints.is_hinting());
    }
}

#[test]
fn test_stale_range_at_commit_is_recovered() {
    for backend in BACKENDS {
        let mut h = scenario_one(backend);
        {
            // Host rewrites the trigger without a key-up reaching the widget.
            let mut doc = h.editor.borrow_mut();
            let node = doc.caret().0;
            doc.set_caret(node, 7);
            doc.backspace();
            doc.insert_text("x");
        }
        assert_eq!(h.text(), "hello xa");
        assert!(h.hints.is_hinting());

        assert_eq!(h.hints.key_down(KeyEvent::Enter).unwrap(), KeyResult::Handled);
        assert_eq!(h.text(), "hello xa");
        assert!(!h.hints.is_hinting());
        assert!(!h.hints.view().visible);
        assert!(h.hints.take_committed().is_none());

        // The widget keeps working afterwards.
        h.editor.borrow_mut().move_end();
        h.type_text(" @b");
        assert_eq!(h.menu(), vec!["bob"]);
    }
}

#[test]
fn test_queued_detections_read_latest_state() {
    let mut h = Harness::new("hello ", Backend::Range, people());
    for ch in "@an".chars() {
        h.hints.key_down(KeyEvent::Char(ch)).unwrap();
        h.editor.borrow_mut().apply_native(&KeyEvent::Char(ch));
        h.hints.key_up(KeyEvent::Char(ch));
    }
    assert_eq!(h.hints.pending_tasks(), 3);
    assert_eq!(h.hints.tick().unwrap(), 3);

    // The first pass saw "@an" already, so the trigger was placed at the
    // char before the caret and the keyword never matched.
    assert!(!h.hints.is_hinting());

    h.press(KeyEvent::Backspace);
    h.press(KeyEvent::Backspace);
    assert!(h.hints.is_hinting());
    assert_eq!(h.hints.session().trigger_offset(), Some(6));
}

#[test]
fn test_menu_is_positioned_at_caret_with_offset() {
    let editor = Rc::new(RefCell::new(Document::with_text("ab ").with_editor_origin(100, 50)));
    let config = HintsConfig {
        hints_box_offset_x: 2,
        hints_box_offset_y: 20,
        ..HintsConfig::with_hints(people())
    };
    let mut hints = EditableHints::new(Some(editor.clone()), config).unwrap();
    editor.borrow_mut().apply_native(&KeyEvent::Char('@'));
    hints.key_up(KeyEvent::Char('@'));
    hints.tick().unwrap();

    let view = hints.view();
    assert!(view.visible);
    assert_eq!((view.position.x, view.position.y), (100 + 4 * 8 + 2, 50 + 20));
}
