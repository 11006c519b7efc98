//! Workflow events and side effects
//!
//! Events are what actors (or the system) do to a question; side effects are
//! the follow-up work a transition demands. Effects are returned as data and
//! executed by the dispatcher after the transition commits, never inside the
//! transition itself.

use agrofaq_model::Role;

/// Something that happened to a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// The selector found a specialist for a pending question (system event)
    SpecialistAssigned,
    /// The assigned specialist submitted an answer (initial or revision)
    AnswerSubmitted,
    /// A peer reviewer approved the current answer
    PeerApproved {
        /// Whether this approval completed the required streak
        streak_complete: bool,
    },
    /// A peer reviewer requested a revision (and supplied one)
    PeerRevised,
    /// No eligible peer reviewer remains (system event)
    PeerPoolExhausted,
    /// The moderator judged the answer valid
    ModeratedValid,
    /// The moderator judged the answer invalid
    ModeratedInvalid,
    /// The author published the golden FAQ
    GoldenFaqPublished,
}

impl WorkflowEvent {
    /// Role an actor must hold to trigger this event; `None` for system events
    #[must_use]
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::SpecialistAssigned | Self::PeerPoolExhausted => None,
            Self::AnswerSubmitted
            | Self::PeerApproved { .. }
            | Self::PeerRevised
            | Self::GoldenFaqPublished => Some(Role::AgriSpecialist),
            Self::ModeratedValid | Self::ModeratedInvalid => Some(Role::Moderator),
        }
    }

    /// Stable event name for logs and error messages
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SpecialistAssigned => "specialist_assigned",
            Self::AnswerSubmitted => "answer_submitted",
            Self::PeerApproved { .. } => "peer_approved",
            Self::PeerRevised => "peer_revised",
            Self::PeerPoolExhausted => "peer_pool_exhausted",
            Self::ModeratedValid => "moderated_valid",
            Self::ModeratedInvalid => "moderated_invalid",
            Self::GoldenFaqPublished => "golden_faq_published",
        }
    }
}

impl std::fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Follow-up work demanded by a committed transition
///
/// The engine translates these into outbox jobs with full context (who to
/// notify, which question). The table only names the effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Queue a peer-review assignment for the question
    AssignPeerReviewer,
    /// Queue a moderation assignment for the question
    AssignModerator,
    /// Tell the newly assigned specialist about their task
    NotifyAssignedSpecialist,
    /// Tell the answer author their answer was validated
    NotifyAuthorValidated,
    /// Tell the assigned specialist a revision is required
    NotifyRevisionRequested,
    /// Tell the author the golden FAQ went live
    NotifyFaqPublished,
}

/// Outcome of a validated transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Status the question moves to
    pub next: agrofaq_model::QuestionStatus,
    /// Side effects the dispatcher must execute
    pub effects: Vec<SideEffect>,
}
