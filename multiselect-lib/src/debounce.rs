//! Cancellable quiet-period timer.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs an action once input has been quiet for a fixed period.
///
/// At most one action is pending at a time: scheduling a new one cancels the
/// previous one if its timer has not fired yet. The action runs on the tokio
/// runtime the debouncer was called from, so it should hand off long work
/// (such as a fetch) to its own task rather than await it inline.
///
/// # Example
///
/// ```ignore
/// let debouncer = Debouncer::new(Duration::from_millis(300));
/// for text in ["a", "ab", "abc"] {
///     let text = text.to_string();
///     debouncer.schedule(move || println!("search {}", text));
/// }
/// // prints "search abc" once, 300 ms after the last call
/// ```
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `action`, cancelling whatever was pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });

        if let Ok(mut guard) = self.pending.lock()
            && let Some(previous) = guard.replace(handle)
        {
            previous.abort();
        }
    }

    /// Cancels the pending action, if any. Returns `true` if one was pending.
    pub fn cancel(&self) -> bool {
        let Ok(mut guard) = self.pending.lock() else {
            return false;
        };
        match guard.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if an action is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
