use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

struct Shared<T> {
    token: AtomicU64,
    settled: Mutex<T>,
}

/// A value that only settles once its source has been quiet for `delay`.
///
/// Every [`Debounced::set`] supersedes the pending one; only the last edit in
/// a burst settles, and only it runs its callback.
pub struct Debounced<T> {
    delay: Duration,
    shared: Arc<Shared<T>>,
}

impl<T> std::fmt::Debug for Debounced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.delay)
            .field("token", &self.shared.token.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + 'static> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            shared: Arc::new(Shared {
                token: AtomicU64::new(0),
                settled: Mutex::new(initial),
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The last settled value.
    pub fn get(&self) -> T {
        self.shared.settled.lock().clone()
    }

    /// Schedule `value` to settle after the quiet period.
    ///
    /// `on_settle(previous, current)` runs once it does. The returned task
    /// resolves to `false` when a later edit superseded this one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set<F>(&self, value: T, on_settle: F) -> JoinHandle<bool>
    where
        F: FnOnce(T, T) + Send + 'static,
    {
        let token = self.shared.token.fetch_add(1, Ordering::SeqCst) + 1;
        let shared = Arc::clone(&self.shared);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let previous = {
                let mut settled = shared.settled.lock();
                if shared.token.load(Ordering::SeqCst) != token {
                    return false;
                }
                std::mem::replace(&mut *settled, value.clone())
            };
            on_settle(previous, value);
            true
        })
    }

    /// Settle `value` right away, dropping any pending edit. Returns the previous value.
    pub fn settle_now(&self, value: T) -> T {
        let mut settled = self.shared.settled.lock();
        self.shared.token.fetch_add(1, Ordering::SeqCst);
        std::mem::replace(&mut *settled, value)
    }

    /// Drop any pending edit without settling it.
    pub fn cancel(&self) {
        self.shared.token.fetch_add(1, Ordering::SeqCst);
    }
}
