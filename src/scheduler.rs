//! Period-driven wrapper over actor action dispatch (spec §4.7 "Scheduler
//! (optional, small)").
//!
//! Every scheduled firing submits an action to its target actor via
//! [`crate::actor::Actor::dispatch_via_mailbox`] (spec: "via the ordered
//! mailbox"), so a periodic job's firings never race the actor's other
//! `tell`/`ask` traffic — they simply queue like any other mailbox message.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::task::JoinHandle;

// Layer 3: Internal module imports
use crate::actor::ActorHandle;
use crate::util::JobId;

/// Owns zero or more periodic/one-shot jobs, each submitting a named action
/// to a target actor on a timer (spec §4.7).
///
/// Re-scheduling under an id already in use atomically replaces the
/// previous job (its background task is aborted first), matching spec
/// §4.7 "Re-submitting the same id atomically replaces the previous task".
#[derive(Default)]
pub struct Scheduler {
    jobs: Mutex<HashMap<JobId, JoinHandle<()>>>,
}

impl Scheduler {
    /// An empty scheduler with no jobs running.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fire `action` on `actor` every `period`, after an initial
    /// `initial_delay`, until [`Scheduler::cancel`]led (spec §4.7
    /// `fixed_rate`: successive firings are spaced by `period` regardless
    /// of how long a firing itself took).
    pub fn fixed_rate(
        self: &Arc<Self>,
        id: impl Into<JobId>,
        actor: Arc<dyn ActorHandle>,
        action: impl Into<String>,
        args: impl Into<String>,
        initial_delay: Duration,
        period: Duration,
    ) {
        let action = action.into();
        let args = args.into();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await; // interval's own first tick fires immediately
            loop {
                ticker.tick().await;
                let _ = actor.dispatch_via_mailbox(&action, &args).await;
            }
        });
        self.replace(id.into(), handle);
    }

    /// Fire `action` on `actor`, waiting `period` after each firing
    /// *completes* before scheduling the next one (spec §4.7
    /// `fixed_delay`: unlike `fixed_rate`, a slow firing pushes later ones
    /// back).
    pub fn fixed_delay(
        self: &Arc<Self>,
        id: impl Into<JobId>,
        actor: Arc<dyn ActorHandle>,
        action: impl Into<String>,
        args: impl Into<String>,
        initial_delay: Duration,
        period: Duration,
    ) {
        let action = action.into();
        let args = args.into();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;
            loop {
                let _ = actor.dispatch_via_mailbox(&action, &args).await;
                tokio::time::sleep(period).await;
            }
        });
        self.replace(id.into(), handle);
    }

    /// Fire `action` on `actor` exactly once, after `delay` (spec §4.7
    /// `once`).
    pub fn once(
        self: &Arc<Self>,
        id: impl Into<JobId>,
        actor: Arc<dyn ActorHandle>,
        action: impl Into<String>,
        args: impl Into<String>,
        delay: Duration,
    ) {
        let action = action.into();
        let args = args.into();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = actor.dispatch_via_mailbox(&action, &args).await;
        });
        self.replace(id.into(), handle);
    }

    /// Stop and forget the job registered under `id`, if any (spec §4.7
    /// `cancel`). Already-dispatched firings are not interrupted.
    pub fn cancel(&self, id: impl Into<JobId>) {
        if let Some(handle) = self.jobs.lock().remove(&id.into()) {
            handle.abort();
        }
    }

    /// Number of jobs currently scheduled.
    pub fn job_count(&self) -> usize {
        self.jobs.lock().len()
    }

    fn replace(&self, id: JobId, handle: JoinHandle<()>) {
        if let Some(previous) = self.jobs.lock().insert(id, handle) {
            previous.abort();
        }
    }
}
