//! Keyboard dispatch tests: bindings, default-action suppression, and the
//! conditions under which every binding is inert.

mod helpers;

use cueloop_player::input::{FocusTarget, InputDispatcher, KeyCode, KeyEvent, KeyOutcome, Modifiers};
use helpers::{raw_cues, Fixture};

fn press(f: &mut Fixture, event: KeyEvent) -> KeyOutcome {
    let outcome = InputDispatcher::new().dispatch(&event, &mut f.controller);
    f.pump();
    outcome
}

fn ctrl() -> Modifiers {
    Modifiers {
        ctrl: true,
        ..Modifiers::default()
    }
}

#[test]
fn test_default_action_suppression_table() {
    let cases = [
        (KeyCode::Space, true),
        (KeyCode::ArrowUp, true),
        (KeyCode::ArrowDown, true),
        (KeyCode::ArrowLeft, true),
        (KeyCode::ArrowRight, true),
        (KeyCode::KeyR, false),
    ];

    for (code, prevent_default) in cases {
        let mut f = Fixture::two_cues();
        let outcome = press(&mut f, KeyEvent::new(code));
        assert!(outcome.handled, "{:?} should be handled", code);
        assert_eq!(outcome.prevent_default, prevent_default, "{:?}", code);
    }
}

#[test]
fn test_keys_in_text_fields_are_ignored() {
    for target in [FocusTarget::TextInput, FocusTarget::TextArea] {
        let mut f = Fixture::two_cues();
        let before = f.controller.state().clone();

        for code in [KeyCode::Space, KeyCode::KeyR, KeyCode::ArrowRight] {
            let outcome = press(&mut f, KeyEvent::new(code).with_target(target));
            assert_eq!(outcome, KeyOutcome::default());
        }
        assert_eq!(f.controller.state(), &before);
    }
}

#[test]
fn test_inert_until_ready() {
    let mut f = Fixture::new();
    f.controller.load_subtitles(&raw_cues(&[(0.0, 2.0, "a")]));

    let outcome = press(&mut f, KeyEvent::new(KeyCode::KeyR));
    assert!(!outcome.handled);
    assert!(!outcome.prevent_default);
    assert!(!f.controller.state().is_looping);
}

#[test]
fn test_inert_without_cues() {
    let mut f = Fixture::loaded(&[], 6.0);

    for code in [KeyCode::Space, KeyCode::ArrowDown, KeyCode::KeyR] {
        assert_eq!(press(&mut f, KeyEvent::new(code)), KeyOutcome::default());
    }
    assert!(f.controller.state().show_subtitle);
    assert!(!f.controller.state().is_looping);
    assert!(f.commands().is_empty());
}

#[test]
fn test_key_bindings_drive_controller() {
    let mut f = Fixture::two_cues();

    press(&mut f, KeyEvent::new(KeyCode::ArrowRight));
    assert_eq!(f.controller.state().current_index, Some(1));
    assert!(f.controller.state().is_playing);

    press(&mut f, KeyEvent::new(KeyCode::Space));
    assert!(!f.controller.state().is_playing);

    press(&mut f, KeyEvent::new(KeyCode::ArrowLeft));
    assert_eq!(f.controller.state().current_index, Some(0));

    press(&mut f, KeyEvent::new(KeyCode::ArrowDown));
    assert!(!f.controller.state().show_subtitle);

    press(&mut f, KeyEvent::new(KeyCode::KeyR));
    assert!(f.controller.state().is_looping);
}

#[test]
fn test_arrow_up_replays_current_segment() {
    let mut f = Fixture::two_cues();
    f.controller.select_segment(1, false);
    f.backend.set_position(4.5);

    press(&mut f, KeyEvent::new(KeyCode::ArrowUp));
    assert_eq!(f.controller.state().current_index, Some(1));
    assert!(f.controller.state().is_playing);
    assert!((f.backend.position() - 2.9).abs() < 1e-9);
}

#[test]
fn test_arrow_up_without_selection_does_nothing() {
    let mut f = Fixture::new();
    f.controller.load_subtitles(&raw_cues(&[(0.0, 2.0, "a")]));
    f.load_audio(3.0);
    f.backend.clear_commands();

    let outcome = press(&mut f, KeyEvent::new(KeyCode::ArrowUp));
    assert!(outcome.prevent_default);
    assert_eq!(f.controller.state().current_index, None);
    assert!(f.commands().is_empty());
}

#[test]
fn test_copy_chord() {
    let mut f = Fixture::two_cues();

    let plain = press(&mut f, KeyEvent::new(KeyCode::KeyC));
    assert!(!plain.handled);
    assert!(f.clipboard.contents().is_none());

    let outcome = press(&mut f, KeyEvent::new(KeyCode::KeyC).with_modifiers(ctrl()));
    assert!(outcome.handled);
    assert!(outcome.prevent_default);
    assert_eq!(f.clipboard.contents().as_deref(), Some("a"));

    let cmd_c = KeyEvent::parse("cmd+c").unwrap();
    f.controller.select_segment(1, false);
    press(&mut f, cmd_c);
    assert_eq!(f.clipboard.contents().as_deref(), Some("b"));
}

#[test]
fn test_copy_chord_without_selection_keeps_native_copy() {
    let mut f = Fixture::new();
    f.controller.load_subtitles(&raw_cues(&[(0.0, 2.0, "a")]));
    f.load_audio(3.0);

    let outcome = press(&mut f, KeyEvent::new(KeyCode::KeyC).with_modifiers(ctrl()));
    assert!(!outcome.prevent_default);
    assert!(f.clipboard.contents().is_none());
}

#[test]
fn test_unbound_key_is_ignored() {
    let mut f = Fixture::two_cues();
    assert_eq!(
        press(&mut f, KeyEvent::new(KeyCode::Other)),
        KeyOutcome::default()
    );
}
