//! Cancel-and-rearm timer for keystroke debouncing.
//!
//! Each [`Debouncer::schedule`] cancels the previously armed timer and arms a
//! new one, so only the last call in a burst runs its action. Cancellation only
//! reaches a timer that has not fired yet: once the quiet period has elapsed the
//! action runs to completion even if a newer call arrives meanwhile. Callers that
//! care about stale completions stamp their actions themselves.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Quiet period used by the search widget.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

struct Timer {
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<Timer>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any armed timer and arm a new one that runs `action` after the delay.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (cancel, cancelled) = oneshot::channel::<()>();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => action.await,
                _ = cancelled => {}
            }
        });

        if let Some(previous) = self.lock().replace(Timer { cancel, task }) {
            let _ = previous.cancel.send(());
        }
    }

    /// Cancel the armed timer, if any.
    pub fn cancel(&self) {
        if let Some(timer) = self.lock().take() {
            let _ = timer.cancel.send(());
        }
    }

    /// True while the latest timer is armed or its action is still running.
    pub fn is_active(&self) -> bool {
        self.lock().as_ref().is_some_and(|t| !t.task.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Timer>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
