//! Trailing-edge debouncing on the tokio runtime.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Default quiet period before a debounced call runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Runs only the last of a burst of calls, once the burst has been quiet
/// for the configured delay.
///
/// Each [`call`](Self::call) aborts the pending task, if any, and schedules
/// a new one. Dropping the debouncer cancels whatever is pending, so no
/// work outlives its owner.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `work` to run after the quiet period, replacing any pending
    /// work.
    pub fn call<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work.await;
        }));
    }

    /// Abort pending work. Safe to call when nothing is pending.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether scheduled work has not yet completed.
    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
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
