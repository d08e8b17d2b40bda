//! Headless playhead
//!
//! A clock-driven stand-in for a real audio backend: it tracks where playback
//! would be (tokio clock, so paused-time tests control it) without decoding or
//! outputting any audio. It implements both [`AudioTransport`] and
//! [`RegionEngine`] over one shared playhead, and reports its events into the
//! session channel just like a real backend would.
//!
//! Region exit is detected by [`HeadlessPlayhead::tick`], driven by the ticker
//! subscription at the configured interval.

use super::region::{Region, RegionEngine, RegionEvent, RegionHandle};
use super::transport::{AudioSource, AudioTransport, TransportEvent};
use crate::session::SessionEvent;
use crate::subscription::Subscription;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct PlayheadInner {
    loaded: bool,
    duration: f64,

    /// Position at the last start/seek/pause
    anchor_position: f64,

    /// Clock reading matching `anchor_position` while playing
    playing_since: Option<Instant>,

    region: Option<RegionHandle>,

    /// Playhead was inside `region` at the last check
    inside_region: bool,

    next_region_id: u64,
}

impl PlayheadInner {
    fn position(&self) -> f64 {
        match self.playing_since {
            Some(since) => {
                let elapsed = since.elapsed().as_secs_f64();
                (self.anchor_position + elapsed).min(self.duration)
            }
            None => self.anchor_position,
        }
    }

    fn set_position(&mut self, position: f64) {
        self.anchor_position = if position.is_finite() {
            position.clamp(0.0, self.duration)
        } else {
            0.0
        };
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
        self.inside_region = self
            .region
            .is_some_and(|handle| handle.region.contains(self.anchor_position));
    }
}

/// Shared headless playhead; clones drive the same playhead
#[derive(Debug, Clone)]
pub struct HeadlessPlayhead {
    inner: Arc<Mutex<PlayheadInner>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl HeadlessPlayhead {
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PlayheadInner::default())),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlayheadInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // Closed channel means the session is gone; nothing left to notify
        let _ = self.events.send(event);
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing_since.is_some()
    }

    /// Number of live regions (0 or 1)
    pub fn region_count(&self) -> usize {
        usize::from(self.lock().region.is_some())
    }

    pub fn region(&self) -> Option<Region> {
        self.lock().region.map(|handle| handle.region)
    }

    /// Move the playhead as a user would by clicking the waveform
    ///
    /// Emits `TransportEvent::Interaction`.
    pub fn user_seek(&self, seconds: f64) {
        {
            let mut inner = self.lock();
            if !inner.loaded {
                return;
            }
            inner.set_position(seconds);
        }
        self.emit(SessionEvent::Transport(TransportEvent::Interaction {
            seek_time: seconds,
        }));
    }

    /// Advance the clock-based playhead and report region exit / end of audio
    pub fn tick(&self) {
        let mut pending = Vec::new();
        {
            let mut inner = self.lock();
            if inner.playing_since.is_none() {
                return;
            }

            let position = inner.position();
            let at_end = position >= inner.duration;
            trace!("Playhead at {:.3}", position);

            if let Some(handle) = inner.region {
                let inside = handle.region.contains(position) && !at_end;
                if inner.inside_region && !inside {
                    pending.push(SessionEvent::Region(RegionEvent::RegionOut(handle)));
                }
                inner.inside_region = inside;
            }

            if at_end {
                inner.anchor_position = inner.duration;
                inner.playing_since = None;
                debug!("Headless playhead reached end of audio");
                pending.push(SessionEvent::Transport(TransportEvent::Pause));
            }
        }

        for event in pending {
            self.emit(event);
        }
    }

    /// Run [`tick`](Self::tick) every `interval` until the subscription drops
    pub fn spawn_ticker(&self, interval: Duration) -> Subscription {
        let playhead = self.clone();
        Subscription::new(
            "playhead-ticker",
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                loop {
                    ticker.tick().await;
                    playhead.tick();
                }
            }),
        )
    }
}

impl AudioTransport for HeadlessPlayhead {
    fn load(&mut self, source: &AudioSource) {
        let duration = source
            .duration
            .filter(|d| d.is_finite())
            .unwrap_or(0.0)
            .max(0.0);
        {
            let mut inner = self.lock();
            let next_region_id = inner.next_region_id;
            *inner = PlayheadInner {
                loaded: true,
                duration,
                next_region_id,
                ..PlayheadInner::default()
            };
        }
        debug!("Headless transport loaded {} ({}s)", source.name, duration);
        self.emit(SessionEvent::Transport(TransportEvent::Ready { duration }));
    }

    fn play(&mut self) {
        {
            let mut inner = self.lock();
            if !inner.loaded || inner.playing_since.is_some() {
                return;
            }
            if inner.anchor_position >= inner.duration {
                inner.set_position(0.0);
            }
            inner.playing_since = Some(Instant::now());
        }
        self.emit(SessionEvent::Transport(TransportEvent::Play));
    }

    fn pause(&mut self) {
        {
            let mut inner = self.lock();
            if inner.playing_since.is_none() {
                return;
            }
            inner.anchor_position = inner.position();
            inner.playing_since = None;
        }
        self.emit(SessionEvent::Transport(TransportEvent::Pause));
    }

    fn seek(&mut self, seconds: f64) {
        self.lock().set_position(seconds);
    }

    fn current_time(&self) -> f64 {
        self.lock().position()
    }

    fn duration(&self) -> f64 {
        self.lock().duration
    }

    fn release(&mut self) {
        let mut inner = self.lock();
        inner.loaded = false;
        inner.playing_since = None;
        inner.region = None;
        inner.inside_region = false;
    }
}

impl RegionEngine for HeadlessPlayhead {
    fn clear_regions(&mut self) {
        let mut inner = self.lock();
        inner.region = None;
        inner.inside_region = false;
    }

    fn add_region(&mut self, start: f64, end: f64) -> RegionHandle {
        let mut inner = self.lock();
        inner.next_region_id += 1;
        let handle = RegionHandle {
            id: inner.next_region_id,
            region: Region::new(start, end),
        };
        inner.region = Some(handle);
        inner.inside_region = handle.region.contains(inner.position());
        handle
    }

    fn play_region(&mut self, region: &RegionHandle) {
        self.seek(region.region.start);
        self.lock().inside_region = true;
        self.play();
    }
}
