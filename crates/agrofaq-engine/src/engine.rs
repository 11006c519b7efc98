//! The workflow engine
//!
//! Central orchestrator owning the store, the user directory, the
//! notification arena, and the outbox. Every external operation commits its
//! workflow state synchronously through the transition table and enqueues
//! side-effect jobs (assignments, notifications) for the outbox worker.
//! Callers must not assume notifications have been delivered by the time an
//! operation returns.

use agrofaq_dispatch::{LivePush, NotificationStore, NullPush, Outbox, OutboxJob};
use agrofaq_model::{
    Actor, Answer, AnswerDraft, FaqFilter, FaqId, GoldenFaq, ModerationDraft, ModeratorVerdict,
    NotificationId, NotificationKind, PeerValidation, PeerVerdict, PeerVerdictDraft, Question,
    QuestionDraft, QuestionId, QuestionStatus, RelatedEntity, ValidationId, WorkflowConfig,
};
use agrofaq_store::{UserDirectory, WorkflowStore};
use agrofaq_workflow::{
    guard_actor, moderation_event, transition, valid_count_after, PeerReviewPolicy, SideEffect,
    WorkflowError, WorkflowEvent,
};
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a peer verdict submission
#[derive(Debug, Clone)]
pub enum PeerReviewOutcome {
    /// Approval recorded; more reviews still required
    StreakAdvanced {
        /// The updated consecutive-approval count
        streak: u32,
    },
    /// Approval completed the streak; question moved to moderation
    PromotedToModeration,
    /// Revision recorded; the reviewer's version is now current
    RevisionCreated {
        /// The new current answer
        answer: Answer,
    },
}

/// Outcome of a moderation verdict submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Answer promoted; author may publish the golden FAQ
    ReadyForGoldenFaq,
    /// Answer sent back to the specialist for revision
    NeedsRevision,
}

/// A golden FAQ joined with its question and winning answer
#[derive(Debug, Clone, Serialize)]
pub struct FaqView {
    /// The published record
    pub faq: GoldenFaq,
    /// Question text
    pub question_text: String,
    /// Agronomic classification (drives filtering)
    pub classification: agrofaq_model::Classification,
    /// Winning answer text
    pub answer_text: String,
}

/// The content-review workflow engine
pub struct Engine {
    config: WorkflowConfig,
    store: Arc<WorkflowStore>,
    directory: Arc<UserDirectory>,
    notifications: Arc<NotificationStore>,
    outbox: Arc<Outbox>,
    push: Arc<dyn LivePush>,
    rng: Mutex<StdRng>,
}

impl Engine {
    /// Create an engine with its own empty store and directory
    #[must_use]
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            store: Arc::new(WorkflowStore::new()),
            directory: Arc::new(UserDirectory::new()),
            notifications: Arc::new(NotificationStore::new()),
            outbox: Arc::new(Outbox::new()),
            push: Arc::new(NullPush),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// With a deterministic selector RNG (tests)
    #[must_use]
    pub fn with_rng_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// With a live-push transport
    #[must_use]
    pub fn with_push(mut self, push: Arc<dyn LivePush>) -> Self {
        self.push = push;
        self
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// The entity store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<WorkflowStore> {
        &self.store
    }

    /// The user directory
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    /// The notification arena
    #[inline]
    #[must_use]
    pub fn notifications(&self) -> &Arc<NotificationStore> {
        &self.notifications
    }

    /// The side-effect outbox
    #[inline]
    #[must_use]
    pub fn outbox(&self) -> &Arc<Outbox> {
        &self.outbox
    }

    pub(crate) fn push_transport(&self) -> &Arc<dyn LivePush> {
        &self.push
    }

    pub(crate) fn rng(&self) -> &Mutex<StdRng> {
        &self.rng
    }

    // --- operations ---

    /// Submit a question; assignment happens asynchronously via the outbox
    ///
    /// Question submission is open to any authenticated identity, so the
    /// submitter travels in the draft rather than as a workflow [`Actor`].
    pub async fn submit_question(&self, draft: QuestionDraft) -> Result<QuestionId, WorkflowError> {
        draft.validate()?;

        let mut question = Question::new(draft.text, draft.classification);
        question.submitted_by = draft.submitted_by;
        let id = self.store.insert_question(question);

        self.outbox.enqueue(OutboxJob::AssignSpecialist { question: id });
        tracing::info!(question = %id, "question submitted");
        Ok(id)
    }

    /// Submit a batch of questions (bulk ingestion)
    ///
    /// Each draft validates independently; one malformed row never blocks
    /// the rest of the batch.
    pub async fn submit_questions(
        &self,
        drafts: Vec<QuestionDraft>,
    ) -> Vec<Result<QuestionId, WorkflowError>> {
        let mut results = Vec::with_capacity(drafts.len());
        for draft in drafts {
            results.push(self.submit_question(draft).await);
        }
        results
    }

    /// Submit an answer (initial or revision) as the assigned specialist
    pub async fn submit_answer(
        &self,
        question_id: QuestionId,
        draft: AnswerDraft,
        actor: Actor,
    ) -> Result<Answer, WorkflowError> {
        draft.validate()?;

        let transition_result = self.store.update_question(question_id, |q| {
            guard_actor(WorkflowEvent::AnswerSubmitted, actor.role)?;
            if q.assigned_specialist != Some(actor.id) {
                return Err(WorkflowError::Authorization(format!(
                    "question {question_id} is not assigned to user {}",
                    actor.id
                )));
            }
            let t = transition(q.status, WorkflowEvent::AnswerSubmitted)?;
            q.status = t.next;
            q.consecutive_peer_approvals = 0;
            q.active_reviewer = None;
            Ok::<_, WorkflowError>(t)
        })?;

        let answer =
            self.store
                .create_revision(question_id, actor.id, draft.text, draft.sources)?;
        self.directory.decrement_workload(actor.id)?;

        let snapshot = self.store.question(question_id)?;
        self.enqueue_effects(&snapshot, &transition_result.effects, None);
        tracing::info!(
            question = %question_id,
            version = answer.version,
            author = %actor.id,
            "answer submitted"
        );
        Ok(answer)
    }

    /// Submit a peer verdict as the active reviewer
    pub async fn submit_peer_verdict(
        &self,
        question_id: QuestionId,
        draft: PeerVerdictDraft,
        actor: Actor,
    ) -> Result<PeerReviewOutcome, WorkflowError> {
        draft.validate()?;
        let policy = PeerReviewPolicy::from_config(&self.config);
        let reviewed_answer = self.store.current_answer(question_id)?;

        if reviewed_answer.author == actor.id {
            return Err(WorkflowError::Authorization(
                "reviewers cannot review their own answer".into(),
            ));
        }

        let (transition_result, new_streak) = self.store.update_question(question_id, |q| {
            if q.active_reviewer != Some(actor.id) {
                return Err(WorkflowError::Authorization(format!(
                    "user {} is not the active reviewer for question {question_id}",
                    actor.id
                )));
            }
            let next_streak = policy.next_streak(draft.verdict, q.consecutive_peer_approvals);
            let event = policy.event_for(draft.verdict, next_streak);
            guard_actor(event, actor.role)?;
            let t = transition(q.status, event)?;
            q.status = t.next;
            q.consecutive_peer_approvals = next_streak;
            q.reviewed_by.insert(actor.id);
            q.active_reviewer = None;
            Ok::<_, WorkflowError>((t, next_streak))
        })?;

        self.store.record_peer_validation(PeerValidation {
            id: ValidationId::new(),
            question_id,
            answer_id: reviewed_answer.id,
            reviewer: actor.id,
            verdict: draft.verdict,
            comments: draft.comments.clone(),
            revised_answer_text: draft.revised_answer_text.clone(),
            created_at: Utc::now(),
        });

        let mut revision = None;
        if draft.verdict == PeerVerdict::Revised {
            let text = draft
                .revised_answer_text
                .ok_or_else(|| WorkflowError::Validation("revised_answer_text required".into()))?;
            revision = Some(self.store.create_revision(
                question_id,
                actor.id,
                text,
                reviewed_answer.sources.clone(),
            )?);
        }

        self.directory.decrement_workload(actor.id)?;

        let snapshot = self.store.question(question_id)?;
        self.enqueue_effects(&snapshot, &transition_result.effects, None);
        tracing::info!(
            question = %question_id,
            reviewer = %actor.id,
            verdict = ?draft.verdict,
            streak = new_streak,
            "peer verdict recorded"
        );

        Ok(match (draft.verdict, transition_result.next) {
            (PeerVerdict::Approved, QuestionStatus::PendingModeration) => {
                PeerReviewOutcome::PromotedToModeration
            }
            (PeerVerdict::Approved, _) => PeerReviewOutcome::StreakAdvanced { streak: new_streak },
            (PeerVerdict::Revised, _) => PeerReviewOutcome::RevisionCreated {
                answer: revision.ok_or_else(|| {
                    WorkflowError::Validation("revision was not created".into())
                })?,
            },
        })
    }

    /// Submit the final moderation verdict
    pub async fn submit_moderation_verdict(
        &self,
        question_id: QuestionId,
        draft: ModerationDraft,
        actor: Actor,
    ) -> Result<ModerationOutcome, WorkflowError> {
        draft.validate()?;
        let answer = self.store.current_answer(question_id)?;
        let event = moderation_event(draft.verdict);

        let (transition_result, was_assigned) = self.store.update_question(question_id, |q| {
            guard_actor(event, actor.role)?;
            match q.assigned_moderator {
                Some(m) if m != actor.id => {
                    return Err(WorkflowError::Authorization(format!(
                        "question {question_id} is held by another moderator"
                    )));
                }
                _ => {}
            }
            let t = transition(q.status, event)?;
            // Uniqueness on (answer, moderator) is checked before any
            // mutation so a duplicate leaves the question untouched.
            self.store.record_validation(
                question_id,
                answer.id,
                actor.id,
                draft.verdict,
                draft.comments.clone(),
            )?;
            let was_assigned = q.assigned_moderator.is_some();
            q.status = t.next;
            q.valid_count = valid_count_after(draft.verdict);
            match draft.verdict {
                ModeratorVerdict::Valid => q.assigned_moderator = Some(actor.id),
                ModeratorVerdict::Invalid => {
                    // The rejection closes this moderation round; releasing
                    // the claim lets the next PendingModeration entry get a
                    // fresh assignment and notification. Revision re-enters
                    // the answering phase owned by whoever authored the
                    // rejected version.
                    q.assigned_moderator = None;
                    q.assigned_specialist = Some(answer.author);
                }
            }
            Ok::<_, WorkflowError>((t, was_assigned))
        })?;

        if was_assigned {
            self.directory.decrement_workload(actor.id)?;
        }

        let outcome = match draft.verdict {
            ModeratorVerdict::Valid => {
                self.directory
                    .award_points(answer.author, self.config.incentive_points_per_validation)?;
                // The author now holds the publish task.
                self.directory.increment_workload(answer.author)?;
                ModerationOutcome::ReadyForGoldenFaq
            }
            ModeratorVerdict::Invalid => {
                self.directory
                    .apply_penalty(answer.author, self.config.penalty_per_invalidation)?;
                self.directory.increment_workload(answer.author)?;
                ModerationOutcome::NeedsRevision
            }
        };

        let snapshot = self.store.question(question_id)?;
        self.enqueue_effects(
            &snapshot,
            &transition_result.effects,
            draft.comments.as_deref(),
        );
        tracing::info!(
            question = %question_id,
            moderator = %actor.id,
            verdict = ?draft.verdict,
            "moderation verdict recorded"
        );
        Ok(outcome)
    }

    /// Publish the golden FAQ as the author of the validated answer
    pub async fn create_golden_faq(
        &self,
        question_id: QuestionId,
        actor: Actor,
    ) -> Result<GoldenFaq, WorkflowError> {
        let answer = self.store.current_answer(question_id)?;
        if answer.author != actor.id {
            return Err(WorkflowError::Authorization(
                "only the author of the validated answer may publish the FAQ".into(),
            ));
        }

        let faq = GoldenFaq {
            id: FaqId::new(),
            question_id,
            answer_id: answer.id,
            created_by: actor.id,
            view_count: 0,
            created_at: Utc::now(),
        };
        let faq_record = faq.clone();

        let transition_result = self.store.update_question(question_id, |q| {
            guard_actor(WorkflowEvent::GoldenFaqPublished, actor.role)?;
            let t = transition(q.status, WorkflowEvent::GoldenFaqPublished)?;
            self.store.insert_faq(faq_record)?;
            q.status = t.next;
            Ok::<_, WorkflowError>(t)
        })?;

        self.directory.decrement_workload(actor.id)?;

        let snapshot = self.store.question(question_id)?;
        self.enqueue_effects(&snapshot, &transition_result.effects, None);
        tracing::info!(question = %question_id, faq = %faq.id, "golden FAQ published");
        Ok(faq)
    }

    /// Mark one of the actor's notifications read; idempotent
    pub async fn mark_notification_read(
        &self,
        id: NotificationId,
        actor: Actor,
    ) -> Result<bool, WorkflowError> {
        let notification = self
            .notifications
            .get(id)
            .map_err(Self::dispatch_error)?;
        if notification.user_id != actor.id {
            return Err(WorkflowError::Authorization(
                "notification belongs to another user".into(),
            ));
        }
        self.notifications.mark_read(id).map_err(Self::dispatch_error)
    }

    /// Mark all of the actor's notifications read; returns how many changed
    pub async fn mark_all_notifications_read(&self, actor: Actor) -> usize {
        self.notifications.mark_all_read(actor.id)
    }

    /// List published FAQs matching a classification filter
    pub async fn list_golden_faqs(&self, filter: &FaqFilter) -> Vec<FaqView> {
        let mut views: Vec<FaqView> = self
            .store
            .list_faqs()
            .into_iter()
            .filter_map(|faq| {
                let question = self.store.question(faq.question_id).ok()?;
                if !filter.matches(&question.classification) {
                    return None;
                }
                let answer = self.store.answer(faq.answer_id).ok()?;
                Some(FaqView {
                    faq,
                    question_text: question.text,
                    classification: question.classification,
                    answer_text: answer.text,
                })
            })
            .collect();
        views.sort_by_key(|v| v.faq.created_at);
        views
    }

    /// Record a public view of a FAQ
    pub async fn record_faq_view(&self, id: FaqId) -> Result<u64, WorkflowError> {
        Ok(self.store.record_faq_view(id)?)
    }

    // --- internals ---

    fn dispatch_error(err: agrofaq_dispatch::DispatchError) -> WorkflowError {
        match err {
            agrofaq_dispatch::DispatchError::NotificationNotFound(id) => WorkflowError::NotFound {
                entity: "notification",
                id: id.to_string(),
            },
        }
    }

    /// Translate transition side effects into outbox jobs
    ///
    /// `detail` carries free text for the recipient (moderator comments on a
    /// revision request).
    pub(crate) fn enqueue_effects(
        &self,
        question: &Question,
        effects: &[SideEffect],
        detail: Option<&str>,
    ) {
        for effect in effects {
            let job = match effect {
                SideEffect::AssignPeerReviewer => Some(OutboxJob::AssignPeerReviewer {
                    question: question.id,
                }),
                SideEffect::AssignModerator => Some(OutboxJob::AssignModerator {
                    question: question.id,
                }),
                SideEffect::NotifyAssignedSpecialist => {
                    question.assigned_specialist.map(|user| OutboxJob::Notify {
                        user,
                        kind: NotificationKind::QuestionAssigned,
                        title: "New question assigned".into(),
                        message: format!("Please answer: {}", excerpt(&question.text)),
                        related: RelatedEntity::Question(question.id),
                    })
                }
                SideEffect::NotifyAuthorValidated => {
                    self.current_author(question.id).map(|user| OutboxJob::Notify {
                        user,
                        kind: NotificationKind::AnswerValidated,
                        title: "Answer validated".into(),
                        message: format!(
                            "Your answer to \"{}\" was marked valid; you may publish the FAQ",
                            excerpt(&question.text)
                        ),
                        related: RelatedEntity::Question(question.id),
                    })
                }
                SideEffect::NotifyRevisionRequested => {
                    self.current_author(question.id).map(|user| OutboxJob::Notify {
                        user,
                        kind: NotificationKind::RevisionRequested,
                        title: "Revision requested".into(),
                        message: match detail {
                            Some(comments) => format!(
                                "The moderator rejected your answer to \"{}\": {comments}",
                                excerpt(&question.text)
                            ),
                            None => format!(
                                "The moderator rejected your answer to \"{}\"",
                                excerpt(&question.text)
                            ),
                        },
                        related: RelatedEntity::Question(question.id),
                    })
                }
                SideEffect::NotifyFaqPublished => {
                    self.current_author(question.id).map(|user| OutboxJob::Notify {
                        user,
                        kind: NotificationKind::GoldenFaqPublished,
                        title: "Golden FAQ published".into(),
                        message: format!(
                            "\"{}\" is now in the public FAQ",
                            excerpt(&question.text)
                        ),
                        related: RelatedEntity::Question(question.id),
                    })
                }
            };
            if let Some(job) = job {
                self.outbox.enqueue(job);
            }
        }
    }

    fn current_author(&self, question_id: QuestionId) -> Option<agrofaq_model::UserId> {
        self.store.current_answer(question_id).ok().map(|a| a.author)
    }
}

/// First 80 characters of a question for notification bodies
fn excerpt(text: &str) -> String {
    const MAX: usize = 80;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{head}…")
    }
}
