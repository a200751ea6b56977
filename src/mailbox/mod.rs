//! The per-actor mailbox: a FIFO queue of pending closures (spec §4.1, §5).
//!
//! Back-pressure beyond an unbounded mailbox is out of scope, so there is
//! exactly one mailbox shape here: no bounded variant, no pluggable
//! backpressure strategy.

pub mod queue;

pub use queue::{Job, Mailbox, MailboxClosed};
