//! Player session event loop
//!
//! One task owns the [`PlaybackController`] and applies every event to it in
//! arrival order: transport and region events, key presses, file loads. The
//! listeners that produce those events are registered once and only hold a
//! sender; they never see playback state. Each event is therefore handled
//! against the state as it is *now*, and no two handlers ever interleave.
//!
//! After every event the loop publishes a fresh [`PlaybackSnapshot`] on a
//! `watch` channel for presentation code.

use crate::input::{InputDispatcher, KeyEvent, KeyOutcome};
use crate::playback::{
    AudioSource, PlaybackController, PlaybackSnapshot, RegionEvent, TransportEvent,
};
use crate::segments::RawCue;
use crate::subscription::Subscription;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Everything the session loop reacts to
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Transport(TransportEvent),
    Region(RegionEvent),
    Key(KeyEvent),
    LoadSubtitles(Vec<RawCue>),
    LoadAudio(AudioSource),
    /// End the session and release everything it holds
    Shutdown,
}

/// Cloneable sender used by listeners to feed the session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Queue an event; returns false once the session has ended
    pub fn send(&self, event: SessionEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(SessionEvent::Shutdown);
    }

    /// Raw sender, for transports that report into the session
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.tx.clone()
    }
}

/// Create the session channel before the transport so it can report into it
pub fn channel() -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SessionHandle { tx }, rx)
}

/// Owns the controller and every listener attached to it
pub struct Session {
    controller: PlaybackController,
    dispatcher: InputDispatcher,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    snapshot_tx: watch::Sender<PlaybackSnapshot>,
    subscriptions: Vec<Subscription>,
}

impl Session {
    pub fn new(
        controller: PlaybackController,
        events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(controller.snapshot());
        Self {
            controller,
            dispatcher: InputDispatcher::new(),
            events_rx,
            snapshot_tx,
            subscriptions: Vec::new(),
        }
    }

    /// Observe state changes (read-only)
    pub fn snapshots(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Tie a listener's lifetime to this session
    pub fn attach(&mut self, subscription: Subscription) {
        debug!("Attached subscription {}", subscription.name());
        self.subscriptions.push(subscription);
    }

    /// Apply one event to the controller.
    ///
    /// Returns `false` when the session should stop.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Transport(event) => self.controller.handle_transport_event(event),
            SessionEvent::Region(RegionEvent::RegionOut(region)) => {
                self.controller.handle_region_out(&region)
            }
            SessionEvent::Key(key) => {
                let outcome: KeyOutcome = self.dispatcher.dispatch(&key, &mut self.controller);
                debug!("Key {:?} -> {:?}", key.code, outcome);
            }
            SessionEvent::LoadSubtitles(cues) => self.controller.load_subtitles(&cues),
            SessionEvent::LoadAudio(source) => self.controller.load_audio(&source),
            SessionEvent::Shutdown => return false,
        }

        self.snapshot_tx.send_replace(self.controller.snapshot());
        true
    }

    /// Apply every event already queued, without waiting
    pub fn drain_pending(&mut self) -> bool {
        while let Ok(event) = self.events_rx.try_recv() {
            if !self.handle_event(event) {
                return false;
            }
        }
        true
    }

    /// Process events until shutdown or until every sender is gone.
    ///
    /// Consumes the session: the controller and all subscriptions are dropped
    /// (and so released) when this returns. Returns the final snapshot.
    pub async fn run(mut self) -> PlaybackSnapshot {
        info!("Session started");
        while let Some(event) = self.events_rx.recv().await {
            if !self.handle_event(event) {
                info!("Session shutdown requested");
                break;
            }
        }
        let snapshot = self.controller.snapshot();
        info!("Session ended");
        snapshot
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Listeners first, so nothing reports into a half-released controller
        for mut subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
        self.events_rx.close();
    }
}
