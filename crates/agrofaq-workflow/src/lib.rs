//! AgroFAQ Workflow - the state-transition spine
//!
//! Pure workflow policy, free of I/O:
//! - Central transition table for the question lifecycle
//! - Actor-role guards
//! - Least-loaded assignment selector with random tie-breaking
//! - Peer review aggregation (consecutive-approval streaks)
//! - Moderation gate
//! - The five-category error taxonomy returned at operation boundaries
//!
//! The engine crate wires these policies to the store and the dispatcher.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod event;
pub mod gate;
pub mod review;
pub mod selector;
pub mod transitions;

// Re-exports for convenience
pub use error::{ErrorKind, WorkflowError};
pub use event::{SideEffect, Transition, WorkflowEvent};
pub use gate::{moderation_event, valid_count_after};
pub use review::{reviewer_exclusions, PeerReviewPolicy};
pub use selector::select_worker;
pub use transitions::{allowed_events, guard_actor, transition};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
