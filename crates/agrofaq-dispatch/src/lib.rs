//! AgroFAQ Dispatch - notifications and the side-effect outbox
//!
//! Translates committed workflow transitions into per-user task
//! notifications:
//! - Notification arena (at-most-once creation record, idempotent reads)
//! - Best-effort live-push seam for the external socket transport
//! - FIFO outbox of retryable side-effect jobs (assignments, notifications)
//!
//! Notification persistence is the source of truth for "my tasks";
//! transport delivery never gates workflow state.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod notification;
pub mod outbox;

// Re-exports for convenience
pub use notification::{DispatchError, LivePush, NotificationStore, NullPush};
pub use outbox::{Outbox, OutboxJob, QueuedJob};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
