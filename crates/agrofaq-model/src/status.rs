//! Workflow statuses, roles, and verdict enums

use serde::{Deserialize, Serialize};

/// Question lifecycle status
///
/// The full life of a question runs submission → specialist answer → peer
/// review loop → moderation → golden FAQ. `NeedsRevision` re-enters the
/// answering phase with the same specialist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionStatus {
    /// Submitted, waiting for a specialist to be assigned
    PendingAssignment,
    /// A specialist owns the question and must answer it
    AssignedToSpecialist,
    /// Answer exists, collecting peer verdicts
    PendingPeerReview,
    /// Peer streak complete (or pool exhausted), awaiting moderator verdict
    PendingModeration,
    /// Moderator judged the answer valid; author may publish the FAQ
    ReadyForGoldenFaq,
    /// Moderator judged the answer invalid; assigned specialist must revise
    NeedsRevision,
    /// Terminal: golden FAQ published
    GoldenFaqCreated,
}

impl QuestionStatus {
    /// Whether this status is terminal (no further transitions)
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GoldenFaqCreated)
    }

    /// Whether a question in this status is waiting on an assignment job
    #[inline]
    #[must_use]
    pub fn awaits_assignment(&self) -> bool {
        matches!(
            self,
            Self::PendingAssignment | Self::PendingPeerReview | Self::PendingModeration
        )
    }
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PendingAssignment => "PENDING_ASSIGNMENT",
            Self::AssignedToSpecialist => "ASSIGNED_TO_SPECIALIST",
            Self::PendingPeerReview => "PENDING_PEER_REVIEW",
            Self::PendingModeration => "PENDING_MODERATION",
            Self::ReadyForGoldenFaq => "READY_FOR_GOLDEN_FAQ",
            Self::NeedsRevision => "NEEDS_REVISION",
            Self::GoldenFaqCreated => "GOLDEN_FAQ_CREATED",
        };
        f.write_str(s)
    }
}

/// Personnel role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Authors answers and peer-reviews colleagues' answers
    AgriSpecialist,
    /// Performs the final valid/invalid judgment
    Moderator,
    /// Administrative access (reporting, sweeps)
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AgriSpecialist => "agri_specialist",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        };
        f.write_str(s)
    }
}

/// Peer reviewer verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerVerdict {
    /// Answer is acceptable as-is; advances the approval streak
    Approved,
    /// Answer needs work; reviewer supplies a revised version
    Revised,
}

/// Moderator verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeratorVerdict {
    /// Promote toward golden FAQ
    Valid,
    /// Send back to the specialist for revision
    Invalid,
}

/// Notification type tag, mirroring the workflow event that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A question was assigned to a specialist for answering
    QuestionAssigned,
    /// A peer review task was assigned to a specialist
    PeerReviewAssigned,
    /// A moderation task was assigned to a moderator
    ModerationAssigned,
    /// Moderator judged the answer valid; author may publish
    AnswerValidated,
    /// Moderator judged the answer invalid; revision required
    RevisionRequested,
    /// The golden FAQ was published
    GoldenFaqPublished,
}

impl NotificationKind {
    /// Whether a notification of this kind represents a task the recipient
    /// is expected to act on (as opposed to a pure status update)
    #[inline]
    #[must_use]
    pub fn is_task(&self) -> bool {
        matches!(
            self,
            Self::QuestionAssigned
                | Self::PeerReviewAssigned
                | Self::ModerationAssigned
                | Self::AnswerValidated
                | Self::RevisionRequested
        )
    }
}
