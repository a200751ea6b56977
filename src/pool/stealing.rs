//! Variant A: an unordered parallel executor with no owner tracking
//! (spec §2, §4.3).
//!
//! Workers pull from a single shared queue rather than per-worker deques
//! with an explicit steal protocol — the externally observable effect (no
//! worker idles while another is backed up, no per-task ordering promise)
//! is the same, and it reuses the queue-plus-`Notify` shape already proven
//! out in [`crate::mailbox::queue`].

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

// Layer 3: Internal module imports
use super::errors::PoolError;
use super::traits::{Task, WorkerPool};

struct Inner {
    queue: Mutex<VecDeque<Task>>,
    notify: Notify,
    shut_down: AtomicBool,
    terminated: AtomicBool,
    terminated_notify: Notify,
}

/// A fixed-size pool of worker tasks sharing one unordered work queue.
pub struct StealingPool {
    inner: Arc<Inner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl StealingPool {
    /// Spawn `size` worker tasks (clamped to at least one).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let inner = Arc::new(Inner {
            queue: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            shut_down: AtomicBool::new(false),
            terminated: AtomicBool::new(false),
            terminated_notify: Notify::new(),
        });
        let workers = (0..size)
            .map(|_| tokio::spawn(Self::worker_loop(Arc::clone(&inner))))
            .collect();
        Self {
            inner,
            workers: Mutex::new(workers),
        }
    }

    /// Pool sized to the number of available CPU cores (spec §5 default).
    pub fn with_default_size() -> Self {
        Self::new(num_cpus::get())
    }

    /// Number of worker tasks backing this pool.
    pub fn worker_count(&self) -> usize {
        self.workers.lock().len()
    }

    async fn worker_loop(inner: Arc<Inner>) {
        loop {
            let task = inner.queue.lock().pop_front();
            match task {
                Some(task) => task(),
                None => {
                    if inner.shut_down.load(Ordering::Acquire) {
                        return;
                    }
                    inner.notify.notified().await;
                }
            }
        }
    }
}

#[async_trait]
impl WorkerPool for StealingPool {
    fn execute(&self, task: Task) -> Result<(), PoolError> {
        if self.inner.shut_down.load(Ordering::Acquire) {
            return Err(PoolError::ShutDown);
        }
        self.inner.queue.lock().push_back(task);
        self.inner.notify.notify_one();
        Ok(())
    }

    fn supports_cancellation(&self) -> bool {
        false
    }

    fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::Acquire)
    }

    async fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.notify.notify_waiters();
        let handles = mem::take(&mut *self.workers.lock());
        for handle in handles {
            let _ = handle.await;
        }
        self.inner.terminated.store(true, Ordering::Release);
        self.inner.terminated_notify.notify_waiters();
    }

    async fn await_termination(&self, timeout: Duration) -> bool {
        if self.inner.terminated.load(Ordering::Acquire) {
            return true;
        }
        tokio::time::timeout(timeout, self.inner.terminated_notify.notified())
            .await
            .is_ok()
    }
}
