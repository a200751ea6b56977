//! Two interchangeable worker-pool variants (spec §2, §4.3): an unordered
//! `stealing` pool with no owner tracking, and a `managed` pool adding
//! per-owner submit / urgent-submit / cancel / pending-count.

pub mod errors;
pub mod managed;
pub mod stealing;
pub mod traits;

pub use errors::PoolError;
pub use managed::ManagedPool;
pub use stealing::StealingPool;
pub use traits::{OwnerPool, Task, WorkerPool};
