//! Scoped background subscriptions
//!
//! Long-lived listeners (keyboard reader, playhead ticker) run as tokio tasks.
//! Wrapping the task in a [`Subscription`] ties its lifetime to the owner:
//! dropping the guard aborts the task, on every exit path.

use tokio::task::JoinHandle;
use tracing::debug;

/// Guard for a background listener task
#[must_use = "dropping a Subscription immediately cancels it"]
pub struct Subscription {
    name: &'static str,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(name: &'static str, task: JoinHandle<()>) -> Self {
        debug!("Subscription started: {}", name);
        Self {
            name,
            task: Some(task),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True while the listener task is still running
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the listener now
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Subscription released: {}", self.name);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let sub = Subscription::new(
            "test",
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                flag.store(true, Ordering::SeqCst);
            }),
        );
        assert!(sub.is_active());
        drop(sub);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let mut sub = Subscription::new("idle", tokio::spawn(std::future::pending::<()>()));
        sub.cancel();
        sub.cancel();
        assert!(!sub.is_active());
        assert_eq!(sub.name(), "idle");
    }
}
