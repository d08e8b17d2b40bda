//! Segment playback state machine
//!
//! **Responsibilities:**
//! - Segment selection and region management (one live region at most)
//! - Loop / pause handling when playback leaves the region
//! - Play/pause with "smart resume" to the next segment
//! - Transport event handling (ready, play, pause, user seek)
//! - Subtitle and audio lifecycle
//!
//! Every operation is total: out-of-range indices, an empty cue collection or
//! a transport that is not ready turn the call into a logged no-op.

use super::region::{Region, RegionEngine, RegionHandle};
use super::state::{PlaybackSnapshot, PlaybackState};
use super::transport::{AudioSource, AudioTransport, TransportEvent};
use crate::clipboard::Clipboard;
use crate::config::PlayerConfig;
use crate::notification::{NotificationTimer, Toast};
use crate::segments::{RawCue, SegmentIndex};
use cueloop_common::events::{CueloopEvent, EventBus, TransportState};
use cueloop_common::timecode::format_clock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

/// Owns the playback state and drives the transport and region engine
pub struct PlaybackController {
    state: PlaybackState,
    segments: SegmentIndex,
    transport: Box<dyn AudioTransport>,
    regions: Box<dyn RegionEngine>,
    active_region: Option<RegionHandle>,
    clipboard: Box<dyn Clipboard>,
    notifier: NotificationTimer,
    event_bus: Arc<EventBus>,
    padding: f64,
    audio_name: Option<String>,
    session_id: Option<Uuid>,
}

impl PlaybackController {
    pub fn new(
        transport: Box<dyn AudioTransport>,
        regions: Box<dyn RegionEngine>,
        clipboard: Box<dyn Clipboard>,
        config: &PlayerConfig,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            state: PlaybackState::default(),
            segments: SegmentIndex::new(),
            transport,
            regions,
            active_region: None,
            clipboard,
            notifier: NotificationTimer::new(config.toast_duration),
            event_bus,
            padding: config.padding_sec,
            audio_name: None,
            session_id: None,
        }
    }

    // ========================================
    // Read access
    // ========================================

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn segments(&self) -> &SegmentIndex {
        &self.segments
    }

    /// Region currently alive in the region engine
    pub fn active_region(&self) -> Option<&RegionHandle> {
        self.active_region.as_ref()
    }

    /// Observe transient notifications
    pub fn toasts(&self) -> watch::Receiver<Toast> {
        self.notifier.subscribe()
    }

    pub fn current_toast(&self) -> Toast {
        self.notifier.current()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Read-only copy of the state plus display data
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let active_cue = self.state.current_index.and_then(|index| {
            self.segments
                .get(index)
                .map(|cue| PlaybackSnapshot::active_cue(index, cue, self.state.show_subtitle))
        });

        PlaybackSnapshot {
            state: self.state.clone(),
            cue_count: self.segments.len(),
            audio_name: self.audio_name.clone(),
            active_cue,
            region: self.active_region.map(|handle| handle.region),
        }
    }

    // ========================================
    // Segment state machine
    // ========================================

    /// Make `index` the current segment and rebuild its region.
    ///
    /// With `autoplay` the region plays from its start; without it the
    /// transport position and playing state are left alone (passive
    /// highlighting after a manual seek).
    pub fn select_segment(&mut self, index: usize, autoplay: bool) {
        if !self.state.is_ready {
            debug!("select_segment({}) ignored: transport not ready", index);
            return;
        }
        let Some(cue) = self.segments.get(index) else {
            debug!(
                "select_segment({}) ignored: out of range (cue count {})",
                index,
                self.segments.len()
            );
            return;
        };

        let region = Region::padded(cue, self.padding, self.state.duration);
        self.state.current_index = Some(index);
        self.state.reached_end = false;

        // At most one live region: clear before adding
        self.regions.clear_regions();
        let handle = self.regions.add_region(region.start, region.end);
        self.active_region = Some(handle);

        if autoplay {
            self.regions.play_region(&handle);
        }

        info!(
            "Segment {} selected [{} - {}]{}",
            index,
            format_clock(region.start),
            format_clock(region.end),
            if autoplay { ", playing" } else { "" }
        );
        self.event_bus.emit_lossy(CueloopEvent::SegmentSelected {
            index,
            region_start: region.start,
            region_end: region.end,
            autoplay,
            timestamp: chrono::Utc::now(),
        });
    }

    /// User moved the playhead to `seek_time`
    pub fn handle_interaction(&mut self, seek_time: f64) {
        self.state.reached_end = false;
        match self.segments.find_index_at_time(seek_time) {
            Some(index) => self.select_segment(index, false),
            None => debug!("Seek to {} is outside every cue", format_clock(seek_time)),
        }
    }

    /// Playback left `region`
    ///
    /// Loop mode replays the region; otherwise playback pauses and the
    /// segment is marked as finished. A region that is no longer the live
    /// one (already replaced by a newer selection) is ignored.
    pub fn handle_region_out(&mut self, region: &RegionHandle) {
        if self.active_region.map(|active| active.id) != Some(region.id) {
            debug!("Ignoring region-out for stale region {}", region.id);
            return;
        }

        if self.state.is_looping {
            debug!("Looping segment {:?}", self.state.current_index);
            self.regions.play_region(region);
            self.event_bus.emit_lossy(CueloopEvent::RegionReplayed {
                index: self.state.current_index,
                timestamp: chrono::Utc::now(),
            });
        } else {
            self.pause_transport();
            self.state.reached_end = true;
            info!("Segment {:?} reached its end", self.state.current_index);
            self.event_bus.emit_lossy(CueloopEvent::ReachedEnd {
                index: self.state.current_index,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Play/pause with smart resume
    ///
    /// 1. Playing: pause.
    /// 2. Finished a segment (loop off): play the next segment, if any.
    /// 3. Otherwise resume in place when the playhead is inside the current
    ///    segment's region, else restart the current segment.
    pub fn toggle_play_pause(&mut self) {
        if !self.state.is_ready {
            debug!("toggle_play_pause ignored: transport not ready");
            return;
        }

        if self.state.is_playing {
            self.pause_transport();
            return;
        }

        if self.state.reached_end && !self.state.is_looping {
            match self.next_index() {
                Some(next) => self.select_segment(next, true),
                None => debug!("Smart resume: already at the last segment"),
            }
            return;
        }

        let Some(index) = self.state.current_index else {
            // No segment, no region: playback runs unbounded to the end of audio
            debug!("Resuming without a selected segment");
            self.transport.play();
            return;
        };

        // Resume only mid-segment: a finished segment (loop enabled since) or a
        // playhead parked at the end of audio restarts from the region start
        let position = self.transport.current_time();
        let inside = !self.state.reached_end
            && position < self.state.duration
            && self
                .segments
                .get(index)
                .map(|cue| Region::padded(cue, self.padding, self.state.duration).contains(position))
                .unwrap_or(false);

        if inside {
            debug!("Resuming at {}", format_clock(position));
            self.transport.play();
        } else {
            self.select_segment(index, true);
        }
    }

    /// Play the next segment; no-op at the last one
    pub fn step_next(&mut self) {
        let next = self.state.current_index.map_or(0, |i| i + 1);
        if next >= self.segments.len() {
            debug!("step_next ignored: no next segment");
            return;
        }
        self.select_segment(next, true);
    }

    /// Play the previous segment; no-op at the first one
    pub fn step_prev(&mut self) {
        match self.state.current_index {
            Some(index) if index > 0 => self.select_segment(index - 1, true),
            _ => debug!("step_prev ignored: no previous segment"),
        }
    }

    /// Restart the current segment from its region start
    pub fn replay_current(&mut self) {
        if let Some(index) = self.state.current_index {
            self.select_segment(index, true);
        }
    }

    pub fn toggle_loop(&mut self) {
        self.state.is_looping = !self.state.is_looping;
        let enabled = self.state.is_looping;
        info!("Loop {}", if enabled { "enabled" } else { "disabled" });
        self.notifier
            .show(format!("Loop: {}", if enabled { "ON" } else { "OFF" }));
        self.event_bus.emit_lossy(CueloopEvent::LoopToggled {
            enabled,
            timestamp: chrono::Utc::now(),
        });
    }

    pub fn toggle_subtitle_visibility(&mut self) {
        self.state.show_subtitle = !self.state.show_subtitle;
        let visible = self.state.show_subtitle;
        debug!("Subtitle text {}", if visible { "shown" } else { "hidden" });
        self.event_bus.emit_lossy(CueloopEvent::SubtitleVisibilityToggled {
            visible,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Hand the active cue's text to the clipboard
    pub fn copy_current_text(&mut self) {
        let Some(index) = self.state.current_index else {
            debug!("copy ignored: no segment selected");
            return;
        };
        let Some(cue) = self.segments.get(index) else {
            return;
        };

        self.clipboard.write_text(&cue.text);
        self.notifier.show("Copied");
        info!("Copied text of segment {}", index);
        self.event_bus.emit_lossy(CueloopEvent::TextCopied {
            index,
            timestamp: chrono::Utc::now(),
        });
    }

    // ========================================
    // Transport events and lifecycle
    // ========================================

    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Ready { duration } => {
                self.state.is_ready = true;
                self.state.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
                info!("Audio ready, duration {}", format_clock(self.state.duration));
                self.event_bus.emit_lossy(CueloopEvent::AudioReady {
                    duration: self.state.duration,
                    timestamp: chrono::Utc::now(),
                });
            }
            TransportEvent::Play => self.set_playing(true),
            TransportEvent::Pause => self.set_playing(false),
            TransportEvent::Interaction { seek_time } => self.handle_interaction(seek_time),
        }
    }

    /// Replace the cue collection
    ///
    /// When audio is already ready, segment 0 is selected passively;
    /// otherwise nothing is selected.
    pub fn load_subtitles(&mut self, raw: &[RawCue]) {
        self.segments = SegmentIndex::from_raw(raw);
        self.state.current_index = None;
        self.state.reached_end = false;
        self.clear_region();

        info!("Loaded {} subtitle cues", self.segments.len());
        self.event_bus.emit_lossy(CueloopEvent::SubtitlesLoaded {
            cue_count: self.segments.len(),
            timestamp: chrono::Utc::now(),
        });

        if self.state.is_ready && !self.segments.is_empty() {
            self.select_segment(0, false);
        }
    }

    /// Hand a new source to the transport, discarding the previous session
    pub fn load_audio(&mut self, source: &AudioSource) {
        self.notifier.cancel();
        self.clear_region();
        self.state.current_index = None;
        self.state.is_ready = false;
        self.state.is_playing = false;
        self.state.reached_end = false;
        self.state.duration = 0.0;
        self.audio_name = Some(source.name.clone());

        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);
        self.transport.load(source);

        info!("Loading audio {} (session {})", source.name, session_id);
        self.event_bus.emit_lossy(CueloopEvent::AudioLoaded {
            session_id,
            source: source.name.clone(),
            timestamp: chrono::Utc::now(),
        });
    }

    // ========================================
    // Helpers
    // ========================================

    fn next_index(&self) -> Option<usize> {
        self.state
            .current_index
            .map(|i| i + 1)
            .filter(|next| *next < self.segments.len())
    }

    /// Pause the transport and reflect it locally right away, so
    /// `reached_end` never coexists with `is_playing`
    fn pause_transport(&mut self) {
        self.transport.pause();
        self.set_playing(false);
    }

    fn set_playing(&mut self, playing: bool) {
        if self.state.is_playing == playing {
            return;
        }
        self.state.is_playing = playing;

        let (old_state, new_state) = if playing {
            (TransportState::Paused, TransportState::Playing)
        } else {
            (TransportState::Playing, TransportState::Paused)
        };
        debug!("Playback state: {} -> {}", old_state, new_state);
        self.event_bus.emit_lossy(CueloopEvent::PlaybackStateChanged {
            old_state,
            new_state,
            timestamp: chrono::Utc::now(),
        });
    }

    fn clear_region(&mut self) {
        self.regions.clear_regions();
        self.active_region = None;
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.notifier.cancel();
        self.regions.clear_regions();
        self.transport.release();
        debug!("Playback controller released");
    }
}
