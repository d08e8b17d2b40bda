//! Playback state and the read-only snapshot handed to presentation code

use super::region::Region;
use cueloop_common::timecode::format_timecode;
use serde::Serialize;

/// Playback state for the active session
///
/// Mutated only by [`PlaybackController`](super::PlaybackController).
/// Invariants:
/// - `current_index` is `None` or a valid cue index
/// - `reached_end` implies `!is_playing`
/// - `duration >= 0`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Active cue, `None` when no segment is selected
    pub current_index: Option<usize>,

    /// Region exit replays the region instead of pausing
    pub is_looping: bool,

    /// Cue text shown (otherwise masked)
    pub show_subtitle: bool,

    pub is_playing: bool,

    /// Transport has loaded its source
    pub is_ready: bool,

    /// Audio duration in seconds
    pub duration: f64,

    /// Playback paused because it left the region on its own
    pub reached_end: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: None,
            is_looping: false,
            show_subtitle: true,
            is_playing: false,
            is_ready: false,
            duration: 0.0,
            reached_end: false,
        }
    }
}

/// The cue currently on screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveCue {
    pub index: usize,

    /// Start timecode (`HH:MM:SS,mmm`)
    pub start: String,

    /// End timecode (`HH:MM:SS,mmm`)
    pub end: String,

    /// Cue text, masked when subtitles are hidden
    pub text: String,
}

/// Read-only copy of everything the presentation layer shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,

    /// Number of loaded cues
    pub cue_count: usize,

    /// Name of the loaded audio source
    pub audio_name: Option<String>,

    pub active_cue: Option<ActiveCue>,

    /// Region currently alive in the region engine
    pub region: Option<Region>,
}

impl PlaybackSnapshot {
    pub(crate) fn active_cue(index: usize, cue: &crate::segments::Cue, show: bool) -> ActiveCue {
        ActiveCue {
            index,
            start: format_timecode(cue.start_time),
            end: format_timecode(cue.end_time),
            text: if show { cue.text.clone() } else { cue.masked_text() },
        }
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            state: PlaybackState::default(),
            cue_count: 0,
            audio_name: None,
            active_cue: None,
            region: None,
        }
    }
}
