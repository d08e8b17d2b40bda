//! Transient status notifications ("Loop: ON", "Copied")
//!
//! Single-slot timer: at most one hide task is ever pending. Showing a new
//! message aborts the pending hide task before scheduling its own, so rapid
//! messages replace each other instead of stacking, and the visible period
//! always counts from the latest message.
//!
//! The current notification is published on a `watch` channel; presentation
//! code renders whatever value it last observed.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Notification as seen by the presentation layer
///
/// Hiding keeps the last message and only clears `visible`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub visible: bool,

    /// Sequence number of the `show` call that produced this value
    #[serde(skip)]
    pub seq: u64,
}

/// Single-slot cancellable notification scheduler
pub struct NotificationTimer {
    duration: Duration,
    toast_tx: Arc<watch::Sender<Toast>>,
    pending: Option<JoinHandle<()>>,
    seq: u64,
}

impl NotificationTimer {
    pub fn new(duration: Duration) -> Self {
        let (toast_tx, _) = watch::channel(Toast::default());
        Self {
            duration,
            toast_tx: Arc::new(toast_tx),
            pending: None,
            seq: 0,
        }
    }

    /// Observe notification changes
    pub fn subscribe(&self) -> watch::Receiver<Toast> {
        self.toast_tx.subscribe()
    }

    /// Current notification value
    pub fn current(&self) -> Toast {
        self.toast_tx.borrow().clone()
    }

    /// Display `message` now and hide it after the configured duration.
    ///
    /// Any pending hide task is cancelled first. Outside a tokio runtime the
    /// message is shown but no hide is scheduled.
    pub fn show(&mut self, message: impl Into<String>) {
        self.cancel();

        self.seq += 1;
        let seq = self.seq;
        let message = message.into();
        debug!("Notification: {}", message);
        self.toast_tx.send_replace(Toast {
            message,
            visible: true,
            seq,
        });

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                debug!("No tokio runtime; notification stays until replaced");
                return;
            }
        };

        let toast_tx = Arc::clone(&self.toast_tx);
        let duration = self.duration;
        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(duration).await;
            // A newer show() owns the slot if seq moved on
            toast_tx.send_if_modified(|toast| {
                if toast.seq == seq && toast.visible {
                    toast.visible = false;
                    true
                } else {
                    false
                }
            });
        }));
    }

    /// Cancel the pending hide task, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// True while a hide task is scheduled and has not run yet
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for NotificationTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
