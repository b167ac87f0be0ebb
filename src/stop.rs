//! Cooperative cancellation shared between a worker and whoever stops it.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Waker = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    wakers: Mutex<Vec<Waker>>,
}

/// Cloneable stop flag; all clones observe the same cancellation.
///
/// Threads blocked on their own condition variable register a waker with
/// [`StopToken::on_cancel`] so that cancelling any clone unblocks them.
#[derive(Clone, Default)]
pub struct StopToken {
    inner: Arc<Inner>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the token cancelled and run every registered waker. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        let wakers = {
            let mut guard = self.inner.wakers.lock().expect("stop wakers mutex poisoned");
            mem::take(&mut *guard)
        };
        for waker in wakers {
            waker();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Run `waker` on cancellation, or right away if already cancelled.
    pub fn on_cancel(&self, waker: impl Fn() + Send + Sync + 'static) {
        let mut guard = self.inner.wakers.lock().expect("stop wakers mutex poisoned");
        // Checked under the lock: cancel() stores the flag before taking it.
        if self.is_cancelled() {
            drop(guard);
            waker();
            return;
        }
        guard.push(Box::new(waker));
    }
}

impl fmt::Debug for StopToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
