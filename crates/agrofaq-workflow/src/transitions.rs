//! Central transition table for the question lifecycle
//!
//! All status changes flow through [`transition`]; there is no scattered
//! per-call-site status checking. An event fired against the wrong status is
//! a `StateConflict` with no state change; an actor with the wrong role is
//! an `Authorization` failure, checked by [`guard_actor`] before the table
//! is consulted.

use crate::error::WorkflowError;
use crate::event::{SideEffect, Transition, WorkflowEvent};
use agrofaq_model::{QuestionStatus, Role};

/// Validate and resolve a transition
///
/// Returns the next status and the side effects the dispatcher must run.
/// Rejections are uniform: the question keeps its current status and the
/// caller gets a `StateConflict` naming both the event and the status.
pub fn transition(
    current: QuestionStatus,
    event: WorkflowEvent,
) -> Result<Transition, WorkflowError> {
    use QuestionStatus as S;
    use SideEffect as E;
    use WorkflowEvent as Ev;

    let resolved = match (current, event) {
        (S::PendingAssignment, Ev::SpecialistAssigned) => Some(Transition {
            next: S::AssignedToSpecialist,
            effects: vec![E::NotifyAssignedSpecialist],
        }),
        (S::AssignedToSpecialist | S::NeedsRevision, Ev::AnswerSubmitted) => Some(Transition {
            next: S::PendingPeerReview,
            effects: vec![E::AssignPeerReviewer],
        }),
        (S::PendingPeerReview, Ev::PeerApproved { streak_complete }) => Some(Transition {
            next: if streak_complete {
                S::PendingModeration
            } else {
                S::PendingPeerReview
            },
            effects: if streak_complete {
                vec![E::AssignModerator]
            } else {
                vec![E::AssignPeerReviewer]
            },
        }),
        (S::PendingPeerReview, Ev::PeerRevised) => Some(Transition {
            next: S::PendingPeerReview,
            effects: vec![E::AssignPeerReviewer],
        }),
        (S::PendingPeerReview, Ev::PeerPoolExhausted) => Some(Transition {
            next: S::PendingModeration,
            effects: vec![E::AssignModerator],
        }),
        (S::PendingModeration, Ev::ModeratedValid) => Some(Transition {
            next: S::ReadyForGoldenFaq,
            effects: vec![E::NotifyAuthorValidated],
        }),
        (S::PendingModeration, Ev::ModeratedInvalid) => Some(Transition {
            next: S::NeedsRevision,
            effects: vec![E::NotifyRevisionRequested],
        }),
        (S::ReadyForGoldenFaq, Ev::GoldenFaqPublished) => Some(Transition {
            next: S::GoldenFaqCreated,
            effects: vec![E::NotifyFaqPublished],
        }),
        _ => None,
    };

    resolved.ok_or_else(|| {
        WorkflowError::StateConflict(format!(
            "event {event} is not valid while the question is {current}"
        ))
    })
}

/// Event names accepted in a given status (diagnostics, tests)
#[must_use]
pub fn allowed_events(status: QuestionStatus) -> Vec<&'static str> {
    use QuestionStatus as S;
    match status {
        S::PendingAssignment => vec!["specialist_assigned"],
        S::AssignedToSpecialist | S::NeedsRevision => vec!["answer_submitted"],
        S::PendingPeerReview => vec!["peer_approved", "peer_revised", "peer_pool_exhausted"],
        S::PendingModeration => vec!["moderated_valid", "moderated_invalid"],
        S::ReadyForGoldenFaq => vec!["golden_faq_published"],
        S::GoldenFaqCreated => vec![],
    }
}

/// Reject actors whose role cannot trigger the event
///
/// Identity-level checks (is this the assignee, the active reviewer, the
/// current author) belong to the operations; the table only knows roles.
pub fn guard_actor(event: WorkflowEvent, actor_role: Role) -> Result<(), WorkflowError> {
    match event.required_role() {
        None => Ok(()),
        Some(required) if required == actor_role => Ok(()),
        Some(required) => Err(WorkflowError::Authorization(format!(
            "event {event} requires role {required}, actor is {actor_role}"
        ))),
    }
}
