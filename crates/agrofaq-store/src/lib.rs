//! AgroFAQ Store - arena-style entity storage
//!
//! In-memory document store for the review workflow:
//! - Flat DashMap arenas keyed by opaque ids (no embedded object graphs)
//! - Per-question lineage locks guarding current-answer exclusivity
//! - Uniqueness index for (answer, moderator) verdicts
//! - User directory with an atomic workload ledger
//!
//! The real deployment sits behind a persistent document store; this crate
//! provides the same contract (unique constraints, atomic updates) at the
//! storage boundary so the workflow layer never does naked
//! read-modify-write sequences.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod directory;
pub mod error;
pub mod store;

// Re-exports for convenience
pub use directory::{UserDirectory, UserRecord};
pub use error::StoreError;
pub use store::WorkflowStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
