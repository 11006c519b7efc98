//! Workflow entities
//!
//! Entities reference each other exclusively through opaque ids (see
//! [`crate::ids`]); joins happen in the store layer. Questions and answers
//! are never deleted: the audit trail is the product.

use crate::ids::{AnswerId, FaqId, NotificationId, QuestionId, UserId, ValidationId};
use crate::status::{ModeratorVerdict, NotificationKind, PeerVerdict, QuestionStatus, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Free-text agronomic classification of a question
///
/// All fields are optional; they only drive FAQ filtering and reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Crop name ("wheat", "paddy", ...)
    pub crop: Option<String>,
    /// Growing region
    pub region: Option<String>,
    /// Season ("kharif", "rabi", ...)
    pub season: Option<String>,
    /// Broad category ("pest control", "irrigation", ...)
    pub category: Option<String>,
}

/// A submitted question and its full workflow state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier
    pub id: QuestionId,
    /// Question text as submitted
    pub text: String,
    /// Agronomic classification
    pub classification: Classification,
    /// Current lifecycle status
    pub status: QuestionStatus,
    /// 1 once a moderator marked the current answer valid, 0 otherwise
    pub valid_count: u32,
    /// Consecutive peer approvals since the last revision
    pub consecutive_peer_approvals: u32,
    /// Specialists who already reviewed any version of this question's answer
    pub reviewed_by: HashSet<UserId>,
    /// Specialist currently owning the answer (answering or revising)
    pub assigned_specialist: Option<UserId>,
    /// Peer reviewer currently holding the review task
    pub active_reviewer: Option<UserId>,
    /// Moderator currently holding the moderation task
    pub assigned_moderator: Option<UserId>,
    /// Who submitted the question (external identity, free text)
    pub submitted_by: Option<String>,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Last workflow mutation time
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Create a freshly submitted question in `PendingAssignment`
    #[must_use]
    pub fn new(text: impl Into<String>, classification: Classification) -> Self {
        let now = Utc::now();
        Self {
            id: QuestionId::new(),
            text: text.into(),
            classification,
            status: QuestionStatus::PendingAssignment,
            valid_count: 0,
            consecutive_peer_approvals: 0,
            reviewed_by: HashSet::new(),
            assigned_specialist: None,
            active_reviewer: None,
            assigned_moderator: None,
            submitted_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// With submitter identity
    #[inline]
    #[must_use]
    pub fn with_submitter(mut self, submitter: impl Into<String>) -> Self {
        self.submitted_by = Some(submitter.into());
        self
    }
}

/// One version of a question's answer
///
/// Immutable after creation except the `is_current` flag, which the store
/// flips when a newer version supersedes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Answer identifier
    pub id: AnswerId,
    /// Owning question
    pub question_id: QuestionId,
    /// Author (the assigned specialist, or a peer reviewer for revisions)
    pub author: UserId,
    /// Answer body
    pub text: String,
    /// Cited sources
    pub sources: Vec<String>,
    /// Version ordinal per question, starting at 1
    pub version: u32,
    /// Whether this is the authoritative version
    pub is_current: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Append-only peer review audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerValidation {
    /// Record identifier
    pub id: ValidationId,
    /// Owning question
    pub question_id: QuestionId,
    /// The answer version the verdict applies to
    pub answer_id: AnswerId,
    /// Reviewer (never the answer's author)
    pub reviewer: UserId,
    /// Approve or revise
    pub verdict: PeerVerdict,
    /// Reviewer comments (required for `Revised`)
    pub comments: Option<String>,
    /// Replacement answer text (required for `Revised`)
    pub revised_answer_text: Option<String>,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

/// Append-only moderator verdict record
///
/// At most one per (answer, moderator) pair; the store enforces uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validation {
    /// Record identifier
    pub id: ValidationId,
    /// Owning question
    pub question_id: QuestionId,
    /// The answer version the verdict applies to
    pub answer_id: AnswerId,
    /// Moderator
    pub moderator: UserId,
    /// Valid or invalid
    pub verdict: ModeratorVerdict,
    /// Moderator comments (relayed to the specialist on `Invalid`)
    pub comments: Option<String>,
    /// Verdict ordinal per answer, starting at 1
    pub sequence: u32,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

/// Published knowledge-base artifact; immutable apart from the view counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenFaq {
    /// FAQ identifier
    pub id: FaqId,
    /// Source question
    pub question_id: QuestionId,
    /// The winning answer version
    pub answer_id: AnswerId,
    /// The specialist who published it
    pub created_by: UserId,
    /// Read-side popularity counter
    pub view_count: u64,
    /// Publication time
    pub created_at: DateTime<Utc>,
}

/// Point-in-time snapshot of a personnel record
///
/// The live record lives in the user directory with atomic counters; this
/// struct is the serializable view handed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Workflow role
    pub role: Role,
    /// Account enabled
    pub is_active: bool,
    /// Currently accepting assignments
    pub is_available: bool,
    /// Open assignments held right now
    pub workload_count: u32,
    /// Points earned from validated answers
    pub incentive_points: i64,
    /// Penalty accumulated from invalidated answers
    pub penalty: i64,
}

/// The entity a notification points back at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum RelatedEntity {
    /// A question
    Question(QuestionId),
    /// An answer version
    Answer(AnswerId),
    /// A published FAQ
    GoldenFaq(FaqId),
}

/// Per-user task/notification record
///
/// Persistence here is the source of truth for "my tasks"; live-transport
/// delivery is a best-effort side channel. Read state is independent of the
/// underlying workflow state, so the two can diverge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Notification identifier
    pub id: NotificationId,
    /// Recipient
    pub user_id: UserId,
    /// Workflow event tag
    pub kind: NotificationKind,
    /// Short headline
    pub title: String,
    /// Human-readable body
    pub message: String,
    /// Back-reference to the subject entity
    pub related: RelatedEntity,
    /// Whether the recipient has acknowledged it
    pub is_read: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}
