//! Clipboard collaborator

use std::sync::{Arc, Mutex, PoisonError};

/// Destination for copied cue text
pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str);
}

/// In-process clipboard that remembers the last copied text
///
/// Clones share the same contents, so a caller can keep one clone to read
/// back what the controller copied.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last copied text
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
    }
}
