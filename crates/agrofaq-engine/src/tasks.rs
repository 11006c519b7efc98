//! Task listing and dashboard reporting
//!
//! "My tasks" is derived, not stored: the unread task notifications are the
//! candidate set, and each candidate is re-checked against live entity state
//! before it is presented as actionable. A notification whose underlying work
//! has moved on (another moderator claimed it, the question advanced) simply
//! drops out of the list; its read flag is untouched.

use crate::engine::Engine;
use agrofaq_model::{
    Actor, Notification, NotificationKind, Question, QuestionId, QuestionStatus, RelatedEntity,
    User,
};
use agrofaq_workflow::WorkflowError;
use serde::Serialize;
use std::collections::HashMap;

/// An actionable work item for one user
#[derive(Debug, Clone, Serialize)]
pub struct TaskItem {
    /// The notification that announced the task
    pub notification: Notification,
    /// Live state of the question the task acts on
    pub question: Question,
}

/// Per-user dashboard summary
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// The user's directory snapshot (workload, points, availability)
    pub user: User,
    /// Unread notifications, task or otherwise
    pub unread_notifications: usize,
    /// Answer versions this user has authored
    pub answers_authored: usize,
    /// Peer verdicts this user has submitted
    pub reviews_submitted: usize,
    /// Golden FAQs this user has published
    pub faqs_published: usize,
    /// System-wide question counts grouped by status
    pub questions_by_status: HashMap<QuestionStatus, usize>,
}

impl Engine {
    /// List the actor's open tasks, oldest first
    ///
    /// Joins unread task notifications with live question state and keeps
    /// only those still actionable by this actor right now.
    pub async fn list_my_tasks(&self, actor: Actor) -> Vec<TaskItem> {
        self.notifications()
            .unread_for(actor.id)
            .into_iter()
            .filter(|n| n.kind.is_task())
            .filter_map(|n| {
                let question_id = self.question_for(n.related)?;
                let question = self.store().question(question_id).ok()?;
                if self.is_actionable(&n, &question, &actor) {
                    Some(TaskItem { notification: n, question })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Dashboard summary for one user
    pub async fn get_dashboard_stats(&self, actor: Actor) -> Result<DashboardStats, WorkflowError> {
        let user = self.directory().require(actor.id)?.snapshot();
        Ok(DashboardStats {
            unread_notifications: self.notifications().unread_count(actor.id),
            answers_authored: self.store().answers_authored_by(actor.id),
            reviews_submitted: self.store().reviews_by(actor.id),
            faqs_published: self.store().faqs_published_by(actor.id),
            questions_by_status: self.store().status_counts(),
            user,
        })
    }

    fn question_for(&self, related: RelatedEntity) -> Option<QuestionId> {
        match related {
            RelatedEntity::Question(id) => Some(id),
            RelatedEntity::Answer(id) => self.store().answer(id).ok().map(|a| a.question_id),
            RelatedEntity::GoldenFaq(id) => self.store().faq(id).ok().map(|f| f.question_id),
        }
    }

    /// Whether the announced task still exists in the live workflow state
    fn is_actionable(&self, notification: &Notification, question: &Question, actor: &Actor) -> bool {
        match notification.kind {
            NotificationKind::QuestionAssigned => {
                question.status == QuestionStatus::AssignedToSpecialist
                    && question.assigned_specialist == Some(actor.id)
            }
            NotificationKind::PeerReviewAssigned => {
                question.status == QuestionStatus::PendingPeerReview
                    && question.active_reviewer == Some(actor.id)
            }
            NotificationKind::ModerationAssigned => {
                question.status == QuestionStatus::PendingModeration
                    && question.assigned_moderator == Some(actor.id)
            }
            NotificationKind::AnswerValidated => {
                question.status == QuestionStatus::ReadyForGoldenFaq
                    && self
                        .store()
                        .current_answer(question.id)
                        .is_ok_and(|a| a.author == actor.id)
            }
            NotificationKind::RevisionRequested => {
                question.status == QuestionStatus::NeedsRevision
                    && question.assigned_specialist == Some(actor.id)
            }
            NotificationKind::GoldenFaqPublished => false,
        }
    }
}
