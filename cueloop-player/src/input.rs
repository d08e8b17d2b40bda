//! Keyboard input dispatch
//!
//! Maps key events to controller operations. The dispatcher holds no state of
//! its own: each key is resolved against the controller's state at the moment
//! it is dispatched, never against a copy taken when the listener was set up.

use crate::playback::PlaybackController;

/// Keys with a binding (everything else is `Other`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    KeyR,
    KeyC,
    Other,
}

/// Modifier keys held during the key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Element that had focus when the key was pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusTarget {
    #[default]
    Document,
    TextInput,
    TextArea,
}

impl FocusTarget {
    /// Text-entry targets keep their keys for normal typing
    pub fn is_text_entry(&self) -> bool {
        matches!(self, FocusTarget::TextInput | FocusTarget::TextArea)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub target: FocusTarget,
}

impl KeyEvent {
    /// Key press on the document without modifiers
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::default(),
            target: FocusTarget::Document,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_target(mut self, target: FocusTarget) -> Self {
        self.target = target;
        self
    }

    /// Parse a key name as typed on the headless player's stdin
    ///
    /// Accepts `space`, `up`, `down`, `left`, `right`, `r`, `c`, `ctrl+c`,
    /// `cmd+c` (case-insensitive).
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        let (modifiers, key) = match token.split_once('+') {
            Some(("ctrl", key)) => (
                Modifiers {
                    ctrl: true,
                    ..Modifiers::default()
                },
                key,
            ),
            Some(("cmd", key)) | Some(("meta", key)) => (
                Modifiers {
                    meta: true,
                    ..Modifiers::default()
                },
                key,
            ),
            Some(_) => return None,
            None => (Modifiers::default(), token.as_str()),
        };

        let code = match key {
            "space" | " " => KeyCode::Space,
            "up" => KeyCode::ArrowUp,
            "down" => KeyCode::ArrowDown,
            "left" => KeyCode::ArrowLeft,
            "right" => KeyCode::ArrowRight,
            "r" => KeyCode::KeyR,
            "c" => KeyCode::KeyC,
            _ => return None,
        };
        Some(Self::new(code).with_modifiers(modifiers))
    }
}

/// What the dispatcher did with a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// A binding matched
    pub handled: bool,

    /// The key's default action (scrolling, native copy) must be suppressed
    pub prevent_default: bool,
}

impl KeyOutcome {
    const IGNORED: KeyOutcome = KeyOutcome {
        handled: false,
        prevent_default: false,
    };

    fn handled(prevent_default: bool) -> Self {
        Self {
            handled: true,
            prevent_default,
        }
    }
}

/// Routes key events to [`PlaybackController`] operations
#[derive(Debug, Clone, Copy, Default)]
pub struct InputDispatcher;

impl InputDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Apply `event` to the controller.
    ///
    /// Keys aimed at text fields are never processed. All bindings are inert
    /// until the transport is ready and cues are loaded.
    pub fn dispatch(&self, event: &KeyEvent, controller: &mut PlaybackController) -> KeyOutcome {
        if event.target.is_text_entry() {
            return KeyOutcome::IGNORED;
        }

        let state = controller.state();
        if !state.is_ready || controller.segments().is_empty() {
            return KeyOutcome::IGNORED;
        }
        let has_selection = state.current_index.is_some();

        match event.code {
            KeyCode::Space => {
                controller.toggle_play_pause();
                KeyOutcome::handled(true)
            }
            KeyCode::ArrowUp => {
                if has_selection {
                    controller.replay_current();
                }
                KeyOutcome::handled(true)
            }
            KeyCode::ArrowDown => {
                controller.toggle_subtitle_visibility();
                KeyOutcome::handled(true)
            }
            KeyCode::ArrowLeft => {
                controller.step_prev();
                KeyOutcome::handled(true)
            }
            KeyCode::ArrowRight => {
                controller.step_next();
                KeyOutcome::handled(true)
            }
            KeyCode::KeyR => {
                controller.toggle_loop();
                KeyOutcome::handled(false)
            }
            KeyCode::KeyC => {
                let copy_chord = event.modifiers.ctrl || event.modifiers.meta;
                if copy_chord && has_selection {
                    controller.copy_current_text();
                    KeyOutcome::handled(true)
                } else {
                    KeyOutcome::IGNORED
                }
            }
            KeyCode::Other => KeyOutcome::IGNORED,
        }
    }
}
