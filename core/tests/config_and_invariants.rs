// core/tests/config_and_invariants.rs
//
// Integration tests for construction, configuration files and the
// session/range invariants that must hold between events.
//
// Tests cover:
// - Construction errors (missing editor, bare surface, bad trigger)
// - TOML round-trip with markup and element values
// - Hinting flag and trigger offset move together
// - hide() idempotence
// - Extraction with an unset start leaves the selection alone
// - A surface losing its selection API mid-pass leaves the widget Idle

use editablehints_core::range::detect;
use editablehints_core::{
    Backend, Candidate, Capabilities, Document, EditableHints, EditableSurface, Element, HintValue,
    HintsConfig, HintsError, KeyEvent, KeyResult, RangeSelectionApi,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("editablehints_{}_{}.toml", name, std::process::id()))
}

#[test]
fn test_missing_editor_is_configuration_error() {
    let result = EditableHints::<Document>::new(None, HintsConfig::default());
    match result {
        Err(HintsError::Configuration(msg)) => assert!(msg.contains("Editor")),
        _ => panic!("expected a configuration error"),
    }

    let result = EditableHints::<Document>::builder(HintsConfig::default()).build();
    assert!(matches!(result, Err(HintsError::Configuration(_))));
}

#[test]
fn test_surface_without_selection_api_is_unsupported() {
    let editor = Rc::new(RefCell::new(
        Document::new().with_capabilities(Capabilities::NONE),
    ));
    let result = EditableHints::new(Some(editor.clone()), HintsConfig::default());
    assert!(matches!(result, Err(HintsError::UnsupportedEnvironment)));

    let editor = Rc::new(RefCell::new(
        Document::new().with_capabilities(Capabilities::RANGE_ONLY),
    ));
    let result = EditableHints::builder(HintsConfig::default())
        .editor(editor)
        .backend(Backend::TextRange)
        .build();
    assert!(matches!(result, Err(HintsError::UnsupportedEnvironment)));
}

#[test]
fn test_whitespace_trigger_is_rejected_at_build() {
    let editor = Rc::new(RefCell::new(Document::new()));
    let config = HintsConfig {
        trigger: '\t',
        ..HintsConfig::default()
    };
    let result = EditableHints::new(Some(editor), config);
    assert!(matches!(result, Err(HintsError::Configuration(_))));
}

#[test]
fn test_toml_round_trip() {
    let config = HintsConfig {
        trigger: '#',
        class_name: "tags".to_string(),
        hints_box_offset_x: -4,
        hints_box_offset_y: 22,
        visible_rows: 3,
        hints: vec![
            Candidate::plain("rust"),
            Candidate::new("ruby", "<em>ruby</em>"),
            Candidate::new(
                "go",
                Element::new("a", "#go").with_attribute("href", "/tags/go"),
            ),
        ],
    };

    let text = config.to_toml_string().unwrap();
    let parsed = HintsConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed, config);

    let path = temp_path("round_trip");
    config.save_toml(&path).unwrap();
    let loaded = HintsConfig::load_toml(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_with_camel_case_option_names() {
    let text = r##"
trigger = "#"
className = "tag-menu"
hintsBoxOffsetY = 18

[[hints]]
text = "release"
value = "#release"

[[hints]]
text = "bug"
value = { tag = "span", text = "#bug" }
"##;
    let config = HintsConfig::from_toml_str(text).unwrap();
    assert_eq!(config.trigger, '#');
    assert_eq!(config.class_name, "tag-menu");
    assert_eq!(config.hints_box_offset_x, 0);
    assert_eq!(config.hints_box_offset_y, 18);
    assert_eq!(config.hints.len(), 2);
    assert_eq!(config.hints[0].value, HintValue::Markup("#release".to_string()));
    assert!(matches!(config.hints[1].value, HintValue::Element(_)));
}

#[test]
fn test_missing_config_file_is_config_error() {
    let err = HintsConfig::load_toml(temp_path("does_not_exist")).unwrap_err();
    assert!(matches!(err, HintsError::Config(_)));
}

#[test]
fn test_hinting_iff_trigger_set_after_every_event() {
    let editor = Rc::new(RefCell::new(Document::with_text("say ")));
    let config = HintsConfig::with_hints(vec![
        Candidate::plain("alice"),
        Candidate::plain("anna"),
        Candidate::plain("bob"),
    ]);
    let mut hints = EditableHints::new(Some(editor.clone()), config).unwrap();

    let keys = [
        KeyEvent::Char('@'),
        KeyEvent::Char('a'),
        KeyEvent::Down,
        KeyEvent::Left,
        KeyEvent::Char('z'),
        KeyEvent::Backspace,
        KeyEvent::Backspace,
        KeyEvent::Char('b'),
        KeyEvent::Escape,
        KeyEvent::Char('@'),
        KeyEvent::Backspace,
        KeyEvent::Char('@'),
        KeyEvent::Enter,
        KeyEvent::Home,
        KeyEvent::Char('@'),
    ];
    for key in keys {
        if hints.key_down(key).unwrap() == KeyResult::NotHandled {
            editor.borrow_mut().apply_native(&key);
        }
        hints.key_up(key);
        hints.tick().unwrap();

        let session = hints.session();
        assert_eq!(
            session.is_hinting(),
            session.trigger_offset().is_some(),
            "after {:?}",
            key
        );
        let view = hints.view();
        assert_eq!(view.visible, session.is_hinting(), "after {:?}", key);
        assert_eq!(view.highlighted.is_some(), view.visible, "after {:?}", key);
    }
}

#[test]
fn test_hide_twice_equals_hide_once() {
    let editor = Rc::new(RefCell::new(Document::new()));
    let mut hints =
        EditableHints::new(Some(editor.clone()), HintsConfig::with_hints(vec![Candidate::plain("x")]))
            .unwrap();
    editor.borrow_mut().apply_native(&KeyEvent::Char('@'));
    hints.key_up(KeyEvent::Char('@'));
    hints.tick().unwrap();
    assert!(hints.is_hinting());

    hints.hide();
    let once = (
        hints.session().state(),
        hints.session().trigger_offset(),
        hints.session().candidates().len(),
        hints.view().visible,
    );
    hints.hide();
    let twice = (
        hints.session().state(),
        hints.session().trigger_offset(),
        hints.session().candidates().len(),
        hints.view().visible,
    );
    assert_eq!(once, twice);
}

#[test]
fn test_unset_start_extracts_nothing_on_both_backends() {
    for backend in [Backend::Range, Backend::TextRange] {
        let editor = Rc::new(RefCell::new(Document::with_text("some text")));
        let resolver = detect(&editor, Some(backend)).unwrap();
        let before = editor.borrow().selection();
        let node = resolver.selected_node().unwrap();

        for end in [0, 4, 9, 1000] {
            let out = resolver.extract_range(node, None, end, true).unwrap();
            assert_eq!(out.text, "");
            assert_eq!(out.range, None);
            assert_eq!(editor.borrow().selection(), before);
        }
    }
}

/// Range-only surface whose selection API goes away after `remaining` lookups.
struct FlakySurface {
    doc: Document,
    remaining: Option<usize>,
}

impl EditableSurface for FlakySurface {
    fn range_selection(&mut self) -> Option<&mut dyn RangeSelectionApi> {
        match self.remaining {
            Some(0) => return None,
            Some(n) => self.remaining = Some(n - 1),
            None => {}
        }
        self.doc.range_selection()
    }
}

#[test]
fn test_lost_selection_api_mid_detection_leaves_idle() {
    for budget in 1..=4 {
        let editor = Rc::new(RefCell::new(FlakySurface {
            doc: Document::with_text("hey ").with_capabilities(Capabilities::RANGE_ONLY),
            remaining: None,
        }));
        let mut hints =
            EditableHints::new(Some(editor.clone()), HintsConfig::with_hints(vec![Candidate::plain("ann")]))
                .unwrap();

        {
            let mut surface = editor.borrow_mut();
            surface.doc.apply_native(&KeyEvent::Char('@'));
            surface.remaining = Some(budget);
        }
        hints.key_up(KeyEvent::Char('@'));
        let result = hints.tick();
        if budget == 1 {
            assert_eq!(result.err(), Some(HintsError::UnsupportedEnvironment));
        } else {
            assert!(
                matches!(result, Ok(_) | Err(HintsError::UnsupportedEnvironment)),
                "budget {}",
                budget
            );
        }

        let session = hints.session();
        assert_eq!(session.is_hinting(), session.trigger_offset().is_some(), "budget {}", budget);
        assert_eq!(hints.view().visible, session.is_hinting(), "budget {}", budget);
        if !session.is_hinting() {
            assert_eq!(session.trigger_offset(), None, "budget {}", budget);
        }

        // Once the API is back, the same text is picked up again.
        editor.borrow_mut().remaining = None;
        hints.key_up(KeyEvent::Char('@'));
        hints.tick().unwrap();
        assert!(hints.is_hinting(), "budget {}", budget);
        assert_eq!(hints.session().trigger_offset(), Some(4));
    }
}
