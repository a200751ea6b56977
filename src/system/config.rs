//! System and workflow-run configuration, with sensible defaults (spec §9
//! "Global mutable logger" companions; §4.2, §4.6).

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Default worker pool size: one worker per available CPU core (spec §5
/// "sized to available CPU cores by default").
pub fn default_pool_size() -> usize {
    num_cpus::get()
}

/// Default bounded grace window `ActorSystem::terminate` waits for pools to
/// finish shutting down (spec §4.2 "≈ 60 s").
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

/// Default cap on `Interpreter::run_until_end` iterations before a run is
/// abandoned as non-terminating. Not specified by the source; chosen as a
/// generous but finite default (see `DESIGN.md`).
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000;

/// System-wide configuration for an [`crate::system::ActorSystem`].
///
/// There is deliberately no mailbox-capacity field: the mailbox is always
/// unbounded (spec §1 Non-goals, "back-pressure beyond an unbounded
/// mailbox").
///
/// # Examples
///
/// ```rust
/// use flowrt::system::SystemConfig;
///
/// let config = SystemConfig::default();
/// assert!(config.pool_size >= 1);
///
/// let config = SystemConfig::builder()
///     .with_pool_size(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.pool_size, 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Worker count for the system's managed pool.
    pub pool_size: usize,

    /// How long `terminate` waits for pools to finish shutting down before
    /// logging (not raising) an overrun.
    pub shutdown_grace: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

impl SystemConfig {
    /// Start building a non-default configuration.
    pub fn builder() -> SystemConfigBuilder {
        SystemConfigBuilder::default()
    }

    /// Reject configurations that could never run (zero workers).
    pub fn validate(&self) -> Result<(), String> {
        if self.pool_size == 0 {
            return Err("pool_size must be > 0".to_string());
        }
        Ok(())
    }
}

/// Fluent builder for [`SystemConfig`].
#[derive(Debug, Default)]
pub struct SystemConfigBuilder {
    config: SystemConfig,
}

impl SystemConfigBuilder {
    /// Override the managed pool's worker count.
    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Override the shutdown grace window.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.config.shutdown_grace = grace;
        self
    }

    /// Validate and produce the final [`SystemConfig`].
    pub fn build(self) -> Result<SystemConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Per-run configuration for the workflow interpreter (spec §4.6, §6 `-m`/`-P`
/// CLI flags).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowRunConfig {
    /// Cap passed to `Interpreter::run_until_end`; `None` uses
    /// [`DEFAULT_MAX_ITERATIONS`].
    pub max_iterations: Option<usize>,

    /// Interpreter variables seeded from `-Pkey=value` CLI overrides before
    /// the first step runs.
    pub variables: HashMap<String, String>,
}

impl WorkflowRunConfig {
    /// The effective iteration cap, falling back to the documented default.
    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }
}
