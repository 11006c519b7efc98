//! Peer review aggregation policy
//!
//! Decides, per verdict, whether the approval streak advances, resets, or
//! promotes the question to moderation. The streak counts consecutive
//! approvals on the question's answer lineage: any revision anywhere resets
//! it to zero, regardless of which version the prior approvals landed on.

use crate::event::WorkflowEvent;
use agrofaq_model::{Answer, PeerVerdict, Question, UserId, WorkflowConfig};
use std::collections::HashSet;

/// Streak policy derived from configuration
#[derive(Debug, Clone, Copy)]
pub struct PeerReviewPolicy {
    /// Consecutive approvals required before moderation
    pub required_approvals: u32,
}

impl PeerReviewPolicy {
    /// Build from workflow configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self {
            required_approvals: config.required_peer_approvals,
        }
    }

    /// The streak after applying a verdict
    #[inline]
    #[must_use]
    pub fn next_streak(&self, verdict: PeerVerdict, current: u32) -> u32 {
        match verdict {
            PeerVerdict::Approved => current + 1,
            PeerVerdict::Revised => 0,
        }
    }

    /// Whether a streak has reached the promotion threshold
    #[inline]
    #[must_use]
    pub fn streak_complete(&self, streak: u32) -> bool {
        streak >= self.required_approvals
    }

    /// The lifecycle event a verdict produces, given the updated streak
    #[must_use]
    pub fn event_for(&self, verdict: PeerVerdict, next_streak: u32) -> WorkflowEvent {
        match verdict {
            PeerVerdict::Approved => WorkflowEvent::PeerApproved {
                streak_complete: self.streak_complete(next_streak),
            },
            PeerVerdict::Revised => WorkflowEvent::PeerRevised,
        }
    }
}

/// Users who may not receive the next peer-review assignment
///
/// Exclusion set = every author across the answer lineage (a reviewer who
/// revised became an author) ∪ everyone who already reviewed this question
/// ∪ the current owner and active reviewer. Prevents reviewers from
/// approving their own chain or double-dipping.
#[must_use]
pub fn reviewer_exclusions(question: &Question, versions: &[Answer]) -> HashSet<UserId> {
    let mut exclude: HashSet<UserId> = question.reviewed_by.iter().copied().collect();
    exclude.extend(versions.iter().map(|a| a.author));
    if let Some(owner) = question.assigned_specialist {
        exclude.insert(owner);
    }
    if let Some(reviewer) = question.active_reviewer {
        exclude.insert(reviewer);
    }
    exclude
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrofaq_model::{AnswerId, Classification, QuestionId};
    use chrono::Utc;

    fn policy() -> PeerReviewPolicy {
        PeerReviewPolicy::from_config(&WorkflowConfig::default())
    }

    fn answer_by(question_id: QuestionId, author: UserId, version: u32) -> Answer {
        Answer {
            id: AnswerId::new(),
            question_id,
            author,
            text: "t".into(),
            sources: vec![],
            version,
            is_current: version > 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn approvals_advance_the_streak() {
        let p = policy();
        assert_eq!(p.next_streak(PeerVerdict::Approved, 0), 1);
        assert_eq!(p.next_streak(PeerVerdict::Approved, 2), 3);
        assert!(p.streak_complete(3));
        assert!(!p.streak_complete(2));
    }

    #[test]
    fn any_revision_resets_to_zero() {
        let p = policy();
        assert_eq!(p.next_streak(PeerVerdict::Revised, 0), 0);
        assert_eq!(p.next_streak(PeerVerdict::Revised, 2), 0);
        assert_eq!(p.next_streak(PeerVerdict::Revised, 7), 0);
    }

    #[test]
    fn events_reflect_streak_state() {
        let p = policy();
        assert_eq!(
            p.event_for(PeerVerdict::Approved, 2),
            WorkflowEvent::PeerApproved {
                streak_complete: false
            }
        );
        assert_eq!(
            p.event_for(PeerVerdict::Approved, 3),
            WorkflowEvent::PeerApproved {
                streak_complete: true
            }
        );
        assert_eq!(p.event_for(PeerVerdict::Revised, 0), WorkflowEvent::PeerRevised);
    }

    #[test]
    fn exclusions_cover_authors_and_past_reviewers() {
        let qid = QuestionId::new();
        let original_author = UserId::new();
        let revising_reviewer = UserId::new();
        let past_reviewer = UserId::new();
        let fresh = UserId::new();

        let mut question = Question::new("q", Classification::default());
        question.assigned_specialist = Some(original_author);
        question.reviewed_by.insert(past_reviewer);
        question.reviewed_by.insert(revising_reviewer);

        let versions = vec![
            answer_by(qid, original_author, 1),
            answer_by(qid, revising_reviewer, 2),
        ];

        let exclude = reviewer_exclusions(&question, &versions);
        assert!(exclude.contains(&original_author));
        assert!(exclude.contains(&revising_reviewer));
        assert!(exclude.contains(&past_reviewer));
        assert!(!exclude.contains(&fresh));
    }
}
