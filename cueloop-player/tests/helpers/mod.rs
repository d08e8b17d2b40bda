//! Shared test infrastructure for controller and dispatcher tests
//!
//! `MockBackend` plays both the audio transport and the region engine. It
//! records every command it receives and queues the events a real backend
//! would report back; `Fixture::pump` feeds those events to the controller.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cueloop_common::events::{CueloopEvent, EventBus};
use cueloop_common::timecode::format_timecode;
use cueloop_player::clipboard::MemoryClipboard;
use cueloop_player::config::PlayerConfig;
use cueloop_player::playback::{
    AudioSource, AudioTransport, PlaybackController, Region, RegionEngine, RegionHandle,
    TransportEvent,
};
use cueloop_player::segments::RawCue;
use tokio::sync::broadcast;

/// Command received by the mock backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    Release,
    ClearRegions,
    AddRegion { start: f64, end: f64 },
    PlayRegion(u64),
}

#[derive(Debug, Default)]
struct MockInner {
    commands: Vec<BackendCommand>,
    pending: Vec<TransportEvent>,
    position: f64,
    duration: f64,
    playing: bool,
    live_regions: Vec<RegionHandle>,
    next_region_id: u64,
}

/// Recording transport + region engine; clones share state
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockInner>>,
}

impl MockBackend {
    pub fn commands(&self) -> Vec<BackendCommand> {
        self.inner.lock().unwrap().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.inner.lock().unwrap().commands.clear();
    }

    pub fn take_pending(&self) -> Vec<TransportEvent> {
        std::mem::take(&mut self.inner.lock().unwrap().pending)
    }

    pub fn set_position(&self, position: f64) {
        self.inner.lock().unwrap().position = position;
    }

    pub fn position(&self) -> f64 {
        self.inner.lock().unwrap().position
    }

    pub fn is_playing(&self) -> bool {
        self.inner.lock().unwrap().playing
    }

    pub fn live_regions(&self) -> Vec<RegionHandle> {
        self.inner.lock().unwrap().live_regions.clone()
    }

    fn record(&self, command: BackendCommand) {
        self.inner.lock().unwrap().commands.push(command);
    }
}

impl AudioTransport for MockBackend {
    fn load(&mut self, source: &AudioSource) {
        let mut inner = self.inner.lock().unwrap();
        inner.commands.push(BackendCommand::Load(source.name.clone()));
        inner.duration = source.duration.unwrap_or(0.0);
        inner.position = 0.0;
        inner.playing = false;
        let duration = inner.duration;
        inner.pending.push(TransportEvent::Ready { duration });
    }

    fn play(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.commands.push(BackendCommand::Play);
        if !inner.playing {
            inner.playing = true;
            inner.pending.push(TransportEvent::Play);
        }
    }

    fn pause(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.commands.push(BackendCommand::Pause);
        if inner.playing {
            inner.playing = false;
            inner.pending.push(TransportEvent::Pause);
        }
    }

    fn seek(&mut self, seconds: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.commands.push(BackendCommand::Seek(seconds));
        inner.position = seconds;
    }

    fn current_time(&self) -> f64 {
        self.position()
    }

    fn duration(&self) -> f64 {
        self.inner.lock().unwrap().duration
    }

    fn release(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.commands.push(BackendCommand::Release);
        inner.playing = false;
    }
}

impl RegionEngine for MockBackend {
    fn clear_regions(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.commands.push(BackendCommand::ClearRegions);
        inner.live_regions.clear();
    }

    fn add_region(&mut self, start: f64, end: f64) -> RegionHandle {
        let mut inner = self.inner.lock().unwrap();
        inner.commands.push(BackendCommand::AddRegion { start, end });
        inner.next_region_id += 1;
        let handle = RegionHandle {
            id: inner.next_region_id,
            region: Region::new(start, end),
        };
        inner.live_regions.push(handle);
        handle
    }

    fn play_region(&mut self, region: &RegionHandle) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.commands.push(BackendCommand::PlayRegion(region.id));
            inner.position = region.region.start;
            if !inner.playing {
                inner.playing = true;
                inner.pending.push(TransportEvent::Play);
            }
        }
    }
}

/// Build raw cues from `(start, end, text)` triples
pub fn raw_cues(cues: &[(f64, f64, &str)]) -> Vec<RawCue> {
    cues.iter()
        .map(|(start, end, text)| RawCue {
            start_time: format_timecode(*start),
            end_time: format_timecode(*end),
            text: text.to_string(),
        })
        .collect()
}

/// Controller wired to a mock backend and an in-memory clipboard
pub struct Fixture {
    pub controller: PlaybackController,
    pub backend: MockBackend,
    pub clipboard: MemoryClipboard,
    pub events: broadcast::Receiver<CueloopEvent>,
}

impl Fixture {
    /// Nothing loaded yet
    pub fn new() -> Self {
        let backend = MockBackend::default();
        let clipboard = MemoryClipboard::new();
        let event_bus = Arc::new(EventBus::new(100));
        let events = event_bus.subscribe();
        let controller = PlaybackController::new(
            Box::new(backend.clone()),
            Box::new(backend.clone()),
            Box::new(clipboard.clone()),
            &PlayerConfig::default(),
            event_bus,
        );
        Self {
            controller,
            backend,
            clipboard,
            events,
        }
    }

    /// Audio ready with `duration`, then `cues` loaded; command log cleared
    pub fn loaded(cues: &[(f64, f64, &str)], duration: f64) -> Self {
        let mut fixture = Self::new();
        fixture.load_audio(duration);
        fixture.controller.load_subtitles(&raw_cues(cues));
        fixture.pump();
        fixture.backend.clear_commands();
        fixture.drain_events();
        fixture
    }

    /// The two-cue timeline used throughout: "a" at 0-2s, "b" at 3-5s, 6s of audio
    pub fn two_cues() -> Self {
        Self::loaded(&[(0.0, 2.0, "a"), (3.0, 5.0, "b")], 6.0)
    }

    pub fn load_audio(&mut self, duration: f64) {
        self.controller
            .load_audio(&AudioSource::new("test.wav").with_duration(duration));
        self.pump();
    }

    /// Deliver every event the backend queued, as the session loop would
    pub fn pump(&mut self) {
        loop {
            let pending = self.backend.take_pending();
            if pending.is_empty() {
                break;
            }
            for event in pending {
                self.controller.handle_transport_event(event);
            }
        }
    }

    /// Playback reaches the end of the live region
    pub fn region_out(&mut self) {
        let region = *self
            .controller
            .active_region()
            .expect("a live region");
        self.backend.set_position(region.region.end + 0.01);
        self.controller.handle_region_out(&region);
        self.pump();
    }

    pub fn commands(&self) -> Vec<BackendCommand> {
        self.backend.commands()
    }

    pub fn drain_events(&mut self) -> Vec<CueloopEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
