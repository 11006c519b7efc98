//! Workflow engine configuration

use serde::{Deserialize, Serialize};

/// Tunable knobs for the review workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Consecutive peer approvals required before moderation
    pub required_peer_approvals: u32,
    /// How many times an outbox job is attempted before it is parked
    /// for the next sweep
    pub max_job_attempts: u32,
    /// Incentive points awarded to the author of a validated answer
    pub incentive_points_per_validation: i64,
    /// Penalty applied to the author of an invalidated answer
    pub penalty_per_invalidation: i64,
}

impl WorkflowConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different approval threshold
    #[inline]
    #[must_use]
    pub fn with_required_approvals(mut self, n: u32) -> Self {
        self.required_peer_approvals = n;
        self
    }

    /// With a different outbox attempt cap
    #[inline]
    #[must_use]
    pub fn with_max_job_attempts(mut self, n: u32) -> Self {
        self.max_job_attempts = n;
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            required_peer_approvals: 3,
            max_job_attempts: 3,
            incentive_points_per_validation: 10,
            penalty_per_invalidation: 5,
        }
    }
}
