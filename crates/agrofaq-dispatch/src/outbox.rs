//! Side-effect outbox
//!
//! Workflow transitions commit their own state synchronously and enqueue
//! side-effect jobs here for asynchronous, retryable execution. Core
//! invariants never depend on a job having run: a parked assignment job is
//! recoverable through the pending-assignment sweep, and notification
//! failures are logged and swallowed.

use agrofaq_model::{NotificationKind, QuestionId, RelatedEntity, UserId};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A unit of deferred side-effect work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboxJob {
    /// Find and claim a specialist for a pending question
    AssignSpecialist {
        /// The question awaiting a specialist
        question: QuestionId,
    },
    /// Find and claim the next peer reviewer
    AssignPeerReviewer {
        /// The question awaiting a reviewer
        question: QuestionId,
    },
    /// Find and claim a moderator
    AssignModerator {
        /// The question awaiting moderation
        question: QuestionId,
    },
    /// Persist (and best-effort push) a notification
    Notify {
        /// Recipient
        user: UserId,
        /// Workflow event tag
        kind: NotificationKind,
        /// Short headline
        title: String,
        /// Human-readable body
        message: String,
        /// Subject entity
        related: RelatedEntity,
    },
}

impl OutboxJob {
    /// Stable job name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AssignSpecialist { .. } => "assign_specialist",
            Self::AssignPeerReviewer { .. } => "assign_peer_reviewer",
            Self::AssignModerator { .. } => "assign_moderator",
            Self::Notify { .. } => "notify",
        }
    }
}

/// A job plus its delivery bookkeeping
#[derive(Debug, Clone)]
pub struct QueuedJob {
    /// The work to do
    pub job: OutboxJob,
    /// Executions attempted so far
    pub attempts: u32,
}

/// FIFO queue of pending side-effect jobs
///
/// In-process stand-in for a durable outbox table; the contract the engine
/// relies on is enqueue-after-commit and at-least-once execution attempts.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: Mutex<VecDeque<QueuedJob>>,
}

impl Outbox {
    /// Create an empty outbox
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a fresh job
    pub fn enqueue(&self, job: OutboxJob) {
        tracing::debug!(job = job.name(), "outbox job enqueued");
        self.queue.lock().push_back(QueuedJob { job, attempts: 0 });
    }

    /// Put a failed job back with its attempt count bumped
    pub fn requeue(&self, mut queued: QueuedJob) {
        queued.attempts += 1;
        self.queue.lock().push_back(queued);
    }

    /// Take the next job, if any
    #[must_use]
    pub fn pop(&self) -> Option<QueuedJob> {
        self.queue.lock().pop_front()
    }

    /// Jobs currently queued
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Whether the queue is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
