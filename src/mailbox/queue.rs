//! FIFO queue of pending closures belonging to one actor (spec §3, §4.1).
//!
//! This mailbox must support [`Mailbox::clear_pending`] from outside the
//! consumer task, which a plain channel receiver cannot do (you cannot peek
//! or drain a channel you don't own). So the queue itself is a shared,
//! lock-guarded `VecDeque` woken by a `tokio::sync::Notify`, and `Mailbox<T>`
//! is the single `Arc`-backed handle used both to enqueue jobs and to drive
//! the consumer loop — the sender/receiver split is unnecessary once the
//! queue is shared.
//!
//! Bounded mailboxes and backpressure strategies are out of scope: back-
//! pressure beyond an unbounded mailbox is explicitly not supported.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Notify;

// Layer 3: Internal module imports
// (none)

/// A pending unit of work: a closure that will run against the actor's
/// payload exactly once, from the mailbox consumer task.
pub type Job<T> = Box<dyn FnOnce(&mut T) + Send + 'static>;

/// Error returned when enqueuing onto a closed mailbox.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("mailbox is closed")]
pub struct MailboxClosed;

struct Inner<T> {
    queue: Mutex<VecDeque<Job<T>>>,
    notify: Notify,
    closed: AtomicBool,
}

/// Cheaply cloneable handle to one actor's mailbox.
///
/// All clones observe the same underlying queue; this is what lets
/// [`Mailbox::push`] be called concurrently from many senders while a
/// single consumer task drives [`Mailbox::next`] in FIFO order.
pub struct Mailbox<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Mailbox<T> {
    /// Create a new, open, empty mailbox.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::new()),
                notify: Notify::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Enqueue `job` at the back of the queue.
    ///
    /// Fails with [`MailboxClosed`] once [`Mailbox::close`] has been called;
    /// a closed actor never processes further messages, so accepting new
    /// jobs past that point would be misleading.
    pub fn push(&self, job: Job<T>) -> Result<(), MailboxClosed> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(MailboxClosed);
        }
        self.inner.queue.lock().push_back(job);
        self.inner.notify.notify_one();
        Ok(())
    }

    /// Wait for and pop the next job, or return `None` once the mailbox is
    /// closed and drained. This is the consumer loop's only entry point.
    pub async fn next(&self) -> Option<Job<T>> {
        loop {
            if let Some(job) = self.inner.queue.lock().pop_front() {
                return Some(job);
            }
            if self.inner.closed.load(Ordering::Acquire) {
                return None;
            }
            self.inner.notify.notified().await;
        }
    }

    /// Discard all queued-but-not-started jobs, returning how many were
    /// removed. A job already popped by the consumer (in flight) is
    /// unaffected.
    pub fn clear_pending(&self) -> usize {
        let mut queue = self.inner.queue.lock();
        let n = queue.len();
        queue.clear();
        n
    }

    /// Current number of jobs waiting in the queue (an approximation if a
    /// concurrent sender is mid-push).
    pub fn len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// `true` iff the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop accepting new jobs and wake the consumer so it observes closure
    /// once the queue drains (or immediately, if already empty). Idempotent.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// `true` once [`Mailbox::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    #[tokio::test]
    async fn fifo_order_preserved() {
        let mailbox: Mailbox<Vec<i32>> = Mailbox::new();
        for i in 0..10 {
            mailbox.push(Box::new(move |v: &mut Vec<i32>| v.push(i))).unwrap();
        }
        mailbox.close();
        let mut payload = Vec::new();
        while let Some(job) = mailbox.next().await {
            job(&mut payload);
        }
        assert_eq!(payload, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn next_waits_then_returns_job() {
        let mailbox: Mailbox<AtomicI32> = Mailbox::new();
        let mb2 = mailbox.clone();
        let handle = tokio::spawn(async move {
            let job = mb2.next().await.unwrap();
            let payload = AtomicI32::new(0);
            job(&payload.into());
        });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        mailbox
            .push(Box::new(|v: &mut AtomicI32| {
                v.store(1, Ordering::SeqCst);
            }))
            .unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn clear_pending_drops_queued_jobs_only() {
        let mailbox: Mailbox<u32> = Mailbox::new();
        for _ in 0..5 {
            mailbox.push(Box::new(|v: &mut u32| *v += 1)).unwrap();
        }
        let removed = mailbox.clear_pending();
        assert_eq!(removed, 5);
        assert!(mailbox.is_empty());
    }

    #[tokio::test]
    async fn closed_mailbox_rejects_new_jobs() {
        let mailbox: Mailbox<u32> = Mailbox::new();
        mailbox.close();
        assert!(mailbox.push(Box::new(|_: &mut u32| {})).is_err());
    }

    #[tokio::test]
    async fn next_returns_none_after_close_and_drain() {
        let mailbox: Mailbox<u32> = Mailbox::new();
        mailbox.close();
        assert!(mailbox.next().await.is_none());
    }
}
