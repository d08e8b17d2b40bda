//! Audio transport capability
//!
//! The controller never decodes or outputs audio itself. It drives an
//! [`AudioTransport`] and learns about its progress through
//! [`TransportEvent`]s delivered to the session loop.
//!
//! Commands are fire-and-forget: `load` completes later with a `Ready` event,
//! and `play`/`pause` are confirmed by `Play`/`Pause` events.

use serde::{Deserialize, Serialize};

/// Handle to an audio source the transport can load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSource {
    /// Display name (usually the file name)
    pub name: String,

    /// Duration in seconds, for transports that cannot read it from the media
    pub duration: Option<f64>,
}

impl AudioSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Events emitted by a transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    /// Source loaded; duration in seconds
    Ready { duration: f64 },

    /// Playback started
    Play,

    /// Playback paused (by command or because the audio ended)
    Pause,

    /// The user moved the playhead directly
    Interaction { seek_time: f64 },
}

/// Audio playback capability consumed by the controller
pub trait AudioTransport: Send {
    /// Start loading a source; completion is reported with `TransportEvent::Ready`
    fn load(&mut self, source: &AudioSource);

    fn play(&mut self);

    fn pause(&mut self);

    /// Move the playhead without emitting `Interaction`
    fn seek(&mut self, seconds: f64);

    /// Playhead position in seconds
    fn current_time(&self) -> f64;

    /// Duration of the loaded source in seconds (0 when nothing is loaded)
    fn duration(&self) -> f64;

    /// Release the underlying resources; the transport is unusable afterwards
    fn release(&mut self) {}
}
