//! Outbox job execution
//!
//! The worker drains side-effect jobs the operations enqueued after
//! committing their state. Jobs are at-least-once and stale-tolerant: every
//! assignment job re-checks live entity state and quietly skips work the
//! workflow has already moved past. Failures never propagate back into the
//! originating transition.

use crate::engine::Engine;
use agrofaq_dispatch::OutboxJob;
use agrofaq_model::{NotificationKind, QuestionId, QuestionStatus, RelatedEntity, Role};
use agrofaq_workflow::{reviewer_exclusions, select_worker, transition, WorkflowError, WorkflowEvent};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

impl Engine {
    /// Execute every job currently queued; returns how many succeeded
    ///
    /// Retryable failures (no capacity) are requeued up to the configured
    /// attempt cap, then parked for [`Engine::sweep_pending_assignments`].
    /// Everything else is logged and dropped; workflow state is already
    /// committed and authoritative.
    pub async fn run_outbox_once(&self) -> usize {
        let pending = self.outbox().len();
        let mut executed = 0;
        for _ in 0..pending {
            let Some(queued) = self.outbox().pop() else {
                break;
            };
            let name = queued.job.name();
            match self.execute_job(queued.job.clone()).await {
                Ok(()) => executed += 1,
                Err(err) if err.is_retryable() => {
                    if queued.attempts + 1 < self.config().max_job_attempts {
                        tracing::warn!(
                            job = name,
                            attempts = queued.attempts + 1,
                            error = %err,
                            "outbox job failed; requeued"
                        );
                        self.outbox().requeue(queued);
                    } else {
                        tracing::warn!(
                            job = name,
                            error = %err,
                            "outbox job attempts exhausted; parked until the next sweep"
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(job = name, error = %err, "outbox job dropped");
                }
            }
        }
        executed
    }

    /// Run the outbox worker as a detached tokio task
    pub fn spawn_outbox_worker(self: &Arc<Self>, poll_interval: Duration) -> tokio::task::JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                if engine.run_outbox_once().await == 0 {
                    tokio::time::sleep(poll_interval).await;
                }
            }
        })
    }

    /// Re-enqueue assignment jobs for every question stuck waiting on a
    /// worker (no available personnel at the time of the original attempt)
    ///
    /// The engine never retries assignments on its own clock; the host
    /// decides when capacity may have freed up and calls this sweep.
    pub async fn sweep_pending_assignments(&self) -> usize {
        let mut enqueued = 0;
        for q in self
            .store()
            .questions_by_status(QuestionStatus::PendingAssignment)
        {
            self.outbox()
                .enqueue(OutboxJob::AssignSpecialist { question: q.id });
            enqueued += 1;
        }
        for q in self
            .store()
            .questions_by_status(QuestionStatus::PendingPeerReview)
        {
            if q.active_reviewer.is_none() {
                self.outbox()
                    .enqueue(OutboxJob::AssignPeerReviewer { question: q.id });
                enqueued += 1;
            }
        }
        for q in self
            .store()
            .questions_by_status(QuestionStatus::PendingModeration)
        {
            if q.assigned_moderator.is_none() {
                self.outbox()
                    .enqueue(OutboxJob::AssignModerator { question: q.id });
                enqueued += 1;
            }
        }
        if enqueued > 0 {
            tracing::info!(enqueued, "assignment sweep requeued stuck work items");
        }
        enqueued
    }

    async fn execute_job(&self, job: OutboxJob) -> Result<(), WorkflowError> {
        match job {
            OutboxJob::AssignSpecialist { question } => self.assign_specialist(question),
            OutboxJob::AssignPeerReviewer { question } => self.assign_peer_reviewer(question),
            OutboxJob::AssignModerator { question } => self.assign_moderator(question),
            OutboxJob::Notify {
                user,
                kind,
                title,
                message,
                related,
            } => {
                let record = self
                    .notifications()
                    .notify(user, kind, title, message, related);
                if let Err(err) = self.push_transport().push(&record) {
                    tracing::warn!(
                        notification = %record.id,
                        error = %err,
                        "live push failed; persisted record stands"
                    );
                }
                Ok(())
            }
        }
    }

    fn assign_specialist(&self, question: QuestionId) -> Result<(), WorkflowError> {
        let q = self.store().question(question)?;
        if q.status != QuestionStatus::PendingAssignment {
            tracing::debug!(question = %question, status = %q.status, "stale specialist assignment skipped");
            return Ok(());
        }

        let worker = {
            let mut rng = self.rng().lock();
            select_worker(
                self.directory(),
                Role::AgriSpecialist,
                &HashSet::new(),
                &mut *rng,
            )
        }
        .ok_or(WorkflowError::CapacityUnavailable {
            role: Role::AgriSpecialist,
        })?;

        let result = self.store().update_question(question, |q| {
            let t = transition(q.status, WorkflowEvent::SpecialistAssigned)?;
            q.status = t.next;
            q.assigned_specialist = Some(worker.id);
            Ok::<_, WorkflowError>(t)
        });

        match result {
            Ok(t) => {
                let snapshot = self.store().question(question)?;
                self.enqueue_effects(&snapshot, &t.effects, None);
                tracing::info!(question = %question, specialist = %worker.id, "specialist assigned");
                Ok(())
            }
            Err(err) => {
                // Release the claim taken by the selector.
                worker.decrement_workload();
                Err(err)
            }
        }
    }

    fn assign_peer_reviewer(&self, question: QuestionId) -> Result<(), WorkflowError> {
        let q = self.store().question(question)?;
        if q.status != QuestionStatus::PendingPeerReview || q.active_reviewer.is_some() {
            tracing::debug!(question = %question, status = %q.status, "stale reviewer assignment skipped");
            return Ok(());
        }

        let versions = self.store().answer_versions(question);
        let exclude = reviewer_exclusions(&q, &versions);
        let selected = {
            let mut rng = self.rng().lock();
            select_worker(self.directory(), Role::AgriSpecialist, &exclude, &mut *rng)
        };

        let Some(worker) = selected else {
            // No eligible peer remains: fall back to moderation directly.
            let t = self.store().update_question(question, |q| {
                let t = transition(q.status, WorkflowEvent::PeerPoolExhausted)?;
                q.status = t.next;
                Ok::<_, WorkflowError>(t)
            })?;
            let snapshot = self.store().question(question)?;
            self.enqueue_effects(&snapshot, &t.effects, None);
            tracing::info!(question = %question, "peer pool exhausted; promoted to moderation");
            return Ok(());
        };

        let result = self.store().update_question(question, |q| {
            if q.status != QuestionStatus::PendingPeerReview || q.active_reviewer.is_some() {
                return Err(WorkflowError::StateConflict(
                    "review slot already filled".into(),
                ));
            }
            q.active_reviewer = Some(worker.id);
            Ok::<_, WorkflowError>(())
        });

        match result {
            Ok(()) => {
                self.outbox().enqueue(OutboxJob::Notify {
                    user: worker.id,
                    kind: NotificationKind::PeerReviewAssigned,
                    title: "Peer review assigned".into(),
                    message: format!("Please review the current answer to: {}", q.text),
                    related: RelatedEntity::Question(question),
                });
                tracing::info!(question = %question, reviewer = %worker.id, "peer reviewer assigned");
                Ok(())
            }
            Err(err) => {
                worker.decrement_workload();
                Err(err)
            }
        }
    }

    fn assign_moderator(&self, question: QuestionId) -> Result<(), WorkflowError> {
        let q = self.store().question(question)?;
        if q.status != QuestionStatus::PendingModeration || q.assigned_moderator.is_some() {
            tracing::debug!(question = %question, status = %q.status, "stale moderator assignment skipped");
            return Ok(());
        }

        let worker = {
            let mut rng = self.rng().lock();
            select_worker(self.directory(), Role::Moderator, &HashSet::new(), &mut *rng)
        }
        .ok_or(WorkflowError::CapacityUnavailable {
            role: Role::Moderator,
        })?;

        let result = self.store().update_question(question, |q| {
            if q.status != QuestionStatus::PendingModeration || q.assigned_moderator.is_some() {
                return Err(WorkflowError::StateConflict(
                    "moderation slot already filled".into(),
                ));
            }
            q.assigned_moderator = Some(worker.id);
            Ok::<_, WorkflowError>(())
        });

        match result {
            Ok(()) => {
                self.outbox().enqueue(OutboxJob::Notify {
                    user: worker.id,
                    kind: NotificationKind::ModerationAssigned,
                    title: "Moderation assigned".into(),
                    message: format!("Please validate the approved answer to: {}", q.text),
                    related: RelatedEntity::Question(question),
                });
                tracing::info!(question = %question, moderator = %worker.id, "moderator assigned");
                Ok(())
            }
            Err(err) => {
                worker.decrement_workload();
                Err(err)
            }
        }
    }
}
