//! AgroFAQ Engine - the orchestrator
//!
//! Wires the pure workflow policies to the store and the dispatcher:
//! - Operation surface (submit question/answer/verdicts, publish FAQ)
//! - Outbox worker executing assignment and notification jobs
//! - Pending-assignment sweep for parked work
//! - Task listing and dashboard reporting
//!
//! Operations commit workflow state synchronously; assignments and
//! notifications happen asynchronously through the outbox. Drive the outbox
//! with [`Engine::spawn_outbox_worker`] in a host, or
//! [`Engine::run_outbox_once`] in tests.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod engine;
pub mod jobs;
pub mod tasks;

// Re-exports for convenience
pub use engine::{Engine, FaqView, ModerationOutcome, PeerReviewOutcome};
pub use tasks::{DashboardStats, TaskItem};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
