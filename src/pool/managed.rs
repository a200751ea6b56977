//! Variant B: a managed pool adding per-owner submission, urgent
//! submission, and bulk cancellation (spec §4.3).

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
use super::traits::{OwnerPool, Task, WorkerPool};

struct Entry {
    owner: Option<String>,
    task: Task,
}

struct Inner {
    queue: Mutex<VecDeque<Entry>>,
    notify: Notify,
    shut_down: AtomicBool,
    terminated: AtomicBool,
    terminated_notify: Notify,
}

/// A fixed-size pool that tracks queued tasks by owner so a caller can
/// bulk-cancel everything still pending for one owner (spec §4.3).
///
/// The owner's "task set" (§4.3 invariants) is derived directly from the
/// shared deque rather than kept as a separate side table — the deque is
/// already the single source of truth, so a second structure would only
/// need to be kept in lockstep with it for no added guarantee.
pub struct ManagedPool {
    inner: Arc<Inner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl ManagedPool {
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

    fn submit(&self, owner: Option<&str>, task: Task, front: bool) -> Result<(), PoolError> {
        if self.inner.shut_down.load(Ordering::Acquire) {
            return Err(PoolError::ShutDown);
        }
        let entry = Entry {
            owner: owner.map(str::to_owned),
            task,
        };
        {
            let mut queue = self.inner.queue.lock();
            if front {
                queue.push_front(entry);
            } else {
                queue.push_back(entry);
            }
        }
        self.inner.notify.notify_one();
        Ok(())
    }

    async fn worker_loop(inner: Arc<Inner>) {
        loop {
            let entry = inner.queue.lock().pop_front();
            match entry {
                Some(entry) => (entry.task)(),
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
impl WorkerPool for ManagedPool {
    fn execute(&self, task: Task) -> Result<(), PoolError> {
        self.submit(None, task, false)
    }

    fn supports_cancellation(&self) -> bool {
        true
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

#[async_trait]
impl OwnerPool for ManagedPool {
    fn submit_for_owner(&self, owner: &str, task: Task) -> Result<(), PoolError> {
        self.submit(Some(owner), task, false)
    }

    fn submit_urgent_for_owner(&self, owner: &str, task: Task) -> Result<(), PoolError> {
        self.submit(Some(owner), task, true)
    }

    fn cancel_for_owner(&self, owner: &str) -> usize {
        let mut queue = self.inner.queue.lock();
        let before = queue.len();
        queue.retain(|entry| entry.owner.as_deref() != Some(owner));
        before - queue.len()
    }

    fn pending_for_owner(&self, owner: &str) -> usize {
        self.inner
            .queue
            .lock()
            .iter()
            .filter(|entry| entry.owner.as_deref() == Some(owner))
            .count()
    }
}
