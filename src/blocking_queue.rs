//! Thread-safe FIFO queue with a timeout-bounded blocking pop.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// A synchronized FIFO queue; consumers block for at most a given timeout.
pub struct BlockingQueue<T> {
    inner: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append an item and wake one blocked consumer.
    pub fn push(&self, item: T) {
        let mut guard = self.inner.lock().expect("blocking queue mutex poisoned");
        guard.push_back(item);
        self.available.notify_one();
    }

    /// Pop the front item, waiting up to `timeout` for one to arrive.
    ///
    /// Returns `None` once the timeout has elapsed with the queue still empty.
    /// Spurious wake-ups re-check the queue before the deadline is honored.
    pub fn pop(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.inner.lock().expect("blocking queue mutex poisoned");
        loop {
            if let Some(item) = guard.pop_front() {
                return Some(item);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            // Wait releases the lock and re-acquires it before returning.
            let (next, _) = self
                .available
                .wait_timeout(guard, deadline - now)
                .expect("condvar wait failed");
            guard = next;
        }
    }

    /// Current number of queued items.
    pub fn len(&self) -> usize {
        let guard = self.inner.lock().expect("blocking queue mutex poisoned");
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        let guard = self.inner.lock().expect("blocking queue mutex poisoned");
        guard.is_empty()
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::sync::{Arc, Barrier, Mutex};
    use std::thread;

    #[test]
    fn items_are_consumed_once() {
        let queue = Arc::new(BlockingQueue::new());
        let total_items = 100u64;
        for id in 0..total_items {
            queue.push(id);
        }

        let consumers = 4;
        let barrier = Arc::new(Barrier::new(consumers));
        let seen: Arc<Mutex<HashSet<u64>>> = Arc::new(Mutex::new(HashSet::new()));

        let mut handles = Vec::new();
        for _ in 0..consumers {
            let queue = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            let seen = Arc::clone(&seen);
            handles.push(thread::spawn(move || {
                barrier.wait();
                while let Some(id) = queue.pop(Duration::from_millis(20)) {
                    let mut guard = seen.lock().expect("seen mutex poisoned");
                    assert!(guard.insert(id), "item {id} popped twice");
                }
            }));
        }

        for handle in handles {
            handle.join().expect("consumer thread panicked");
        }

        let guard = seen.lock().expect("seen mutex poisoned");
        assert_eq!(guard.len(), total_items as usize);
        assert!(queue.is_empty());
    }

    #[test]
    fn concurrent_pushers_keep_per_pusher_order() {
        let queue = Arc::new(BlockingQueue::new());
        let pushers = 4u64;
        let per_pusher = 50u64;
        let barrier = Arc::new(Barrier::new(pushers as usize));

        let mut handles = Vec::new();
        for pusher in 0..pushers {
            let queue = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                for seq in 0..per_pusher {
                    queue.push((pusher, seq));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("pusher thread panicked");
        }

        let mut last_seen = vec![None; pushers as usize];
        let mut popped = 0;
        while let Some((pusher, seq)) = queue.pop(Duration::from_millis(10)) {
            let slot = &mut last_seen[pusher as usize];
            if let Some(prev) = *slot {
                assert!(seq > prev, "pusher {pusher} reordered: {prev} then {seq}");
            }
            *slot = Some(seq);
            popped += 1;
        }
        assert_eq!(popped, pushers * per_pusher);
    }

    #[test]
    fn pop_preserves_push_order() {
        let queue = BlockingQueue::new();
        for id in 0..10 {
            queue.push(id);
        }
        assert_eq!(queue.len(), 10);
        for expected in 0..10 {
            assert_eq!(queue.pop(Duration::ZERO), Some(expected));
        }
        assert_eq!(queue.pop(Duration::ZERO), None);
    }

    #[test]
    fn push_wakes_pop_before_its_deadline() {
        let queue = Arc::new(BlockingQueue::new());
        let deadline = Duration::from_secs(5);
        let (started_tx, started_rx) = mpsc::channel();
        let (popped_tx, popped_rx) = mpsc::channel();

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let start = Instant::now();
                started_tx.send(()).expect("send started");
                let item = queue.pop(deadline);
                popped_tx.send((item, start.elapsed())).expect("send popped");
            })
        };

        started_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("consumer started");
        thread::sleep(Duration::from_millis(50));
        queue.push(7u64);

        let (item, waited) = popped_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("pop still blocked after push");
        assert_eq!(item, Some(7));
        assert!(waited < deadline, "pop ran to its deadline: {waited:?}");
        consumer.join().expect("consumer thread panicked");
    }

    #[test]
    fn pop_times_out_on_empty_queue() {
        let queue: BlockingQueue<u64> = BlockingQueue::new();
        let timeout = Duration::from_millis(100);
        let start = Instant::now();
        assert_eq!(queue.pop(timeout), None);
        let elapsed = start.elapsed();
        assert!(elapsed >= timeout, "returned early after {elapsed:?}");
        assert!(elapsed < timeout + Duration::from_millis(500), "overslept {elapsed:?}");
    }

    #[test]
    fn expired_pop_leaves_late_item_queued() {
        let queue = Arc::new(BlockingQueue::<u64>::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop(Duration::from_millis(30)))
        };

        let missed = consumer.join().expect("consumer thread panicked");
        assert_eq!(missed, None);

        // The timed-out consumer is gone; the item waits for the next pop.
        queue.push(11);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop(Duration::ZERO), Some(11));
        assert!(queue.is_empty());
    }
}
