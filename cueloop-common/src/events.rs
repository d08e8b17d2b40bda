//! Event types for the cueloop event system
//!
//! The playback controller announces every state transition on an [`EventBus`]
//! (tokio broadcast). Subscribers are observers only: the binary logs events or
//! prints them as JSON lines, tests assert on them. Nothing subscribed here can
//! write playback state back.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Transport playing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    Playing,
    Paused,
}

impl std::fmt::Display for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportState::Playing => write!(f, "playing"),
            TransportState::Paused => write!(f, "paused"),
        }
    }
}

/// cueloop event types
///
/// Serialized with an internal `type` tag so each event is one self-describing
/// JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CueloopEvent {
    /// A new subtitle collection replaced the previous one
    SubtitlesLoaded {
        /// Number of cues in the new collection
        cue_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A new audio source was handed to the transport
    ///
    /// Starts a new session: the previous source's state is discarded.
    AudioLoaded {
        session_id: Uuid,
        /// Display name of the source
        source: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Transport finished loading and reported its duration
    AudioReady {
        /// Duration in seconds
        duration: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A segment became current and its region was (re)created
    SegmentSelected {
        index: usize,
        /// Padded region start (seconds)
        region_start: f64,
        /// Padded region end (seconds)
        region_end: f64,
        /// Whether playback was started from the region start
        autoplay: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Transport switched between playing and paused
    PlaybackStateChanged {
        old_state: TransportState,
        new_state: TransportState,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback left the active region and paused (loop off)
    ReachedEnd {
        index: Option<usize>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback left the active region and restarted it (loop on)
    RegionReplayed {
        index: Option<usize>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Loop mode toggled
    LoopToggled {
        enabled: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Subtitle text visibility toggled
    SubtitleVisibilityToggled {
        visible: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Active cue text was handed to the clipboard
    TextCopied {
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl CueloopEvent {
    /// Event type name, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            CueloopEvent::SubtitlesLoaded { .. } => "SubtitlesLoaded",
            CueloopEvent::AudioLoaded { .. } => "AudioLoaded",
            CueloopEvent::AudioReady { .. } => "AudioReady",
            CueloopEvent::SegmentSelected { .. } => "SegmentSelected",
            CueloopEvent::PlaybackStateChanged { .. } => "PlaybackStateChanged",
            CueloopEvent::ReachedEnd { .. } => "ReachedEnd",
            CueloopEvent::RegionReplayed { .. } => "RegionReplayed",
            CueloopEvent::LoopToggled { .. } => "LoopToggled",
            CueloopEvent::SubtitleVisibilityToggled { .. } => "SubtitleVisibilityToggled",
            CueloopEvent::TextCopied { .. } => "TextCopied",
        }
    }
}

/// One-to-many event broadcasting
///
/// Thin wrapper over `tokio::sync::broadcast`. Slow subscribers lose the oldest
/// events once `capacity` is exceeded.
pub struct EventBus {
    tx: broadcast::Sender<CueloopEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use cueloop_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<CueloopEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if nobody is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: CueloopEvent,
    ) -> Result<usize, broadcast::error::SendError<CueloopEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: CueloopEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EVENT_CAPACITY)
    }
}
