//! Arena storage for workflow entities
//!
//! Flat DashMap arenas keyed by opaque ids; cross-entity joins are explicit
//! lookups, never embedded object graphs. Compound mutations that must not
//! interleave (the mark-all-then-insert-one of answer versioning, the
//! sequence-numbered verdict append) run inside per-question or per-answer
//! guards so concurrent writers serialize at the store boundary.

use crate::error::StoreError;
use agrofaq_model::{
    Answer, AnswerId, FaqId, GoldenFaq, ModeratorVerdict, PeerValidation, Question, QuestionId,
    QuestionStatus, UserId, Validation, ValidationId,
};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory document store for the review workflow
#[derive(Debug, Default)]
pub struct WorkflowStore {
    questions: DashMap<QuestionId, Question>,
    answers: DashMap<AnswerId, Answer>,
    /// Per-question answer version chain; the mutex is the critical section
    /// guarding current-answer exclusivity.
    lineage: DashMap<QuestionId, Mutex<Vec<AnswerId>>>,
    peer_validations: DashMap<QuestionId, Vec<PeerValidation>>,
    validations: DashMap<AnswerId, Vec<Validation>>,
    /// Uniqueness index for (answer, moderator) pairs
    validation_index: DashMap<(AnswerId, UserId), ValidationId>,
    faqs: DashMap<FaqId, GoldenFaq>,
    faq_by_question: DashMap<QuestionId, FaqId>,
}

impl WorkflowStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- questions ---

    /// Insert a freshly submitted question
    pub fn insert_question(&self, question: Question) -> QuestionId {
        let id = question.id;
        self.questions.insert(id, question);
        id
    }

    /// Fetch a question snapshot
    pub fn question(&self, id: QuestionId) -> Result<Question, StoreError> {
        self.questions
            .get(&id)
            .map(|q| q.clone())
            .ok_or(StoreError::QuestionNotFound(id))
    }

    /// Mutate a question under its entry guard
    ///
    /// The closure runs while the entry lock is held, so guard checks and the
    /// mutation they protect are a single critical section. A closure error
    /// leaves the question untouched only if the closure itself did not
    /// mutate before failing; workflow code checks guards first.
    pub fn update_question<R, E>(
        &self,
        id: QuestionId,
        f: impl FnOnce(&mut Question) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut entry = self
            .questions
            .get_mut(&id)
            .ok_or(StoreError::QuestionNotFound(id))?;
        let result = f(&mut entry)?;
        entry.updated_at = Utc::now();
        Ok(result)
    }

    /// All questions currently in a status
    #[must_use]
    pub fn questions_by_status(&self, status: QuestionStatus) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.status == status)
            .map(|q| q.clone())
            .collect()
    }

    /// Question counts grouped by status (dashboards)
    #[must_use]
    pub fn status_counts(&self) -> HashMap<QuestionStatus, usize> {
        let mut counts = HashMap::new();
        for q in self.questions.iter() {
            *counts.entry(q.status).or_insert(0) += 1;
        }
        counts
    }

    /// Total number of questions
    #[inline]
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    // --- answers ---

    /// Fetch an answer snapshot
    pub fn answer(&self, id: AnswerId) -> Result<Answer, StoreError> {
        self.answers
            .get(&id)
            .map(|a| a.clone())
            .ok_or(StoreError::AnswerNotFound(id))
    }

    /// Create the next answer version for a question
    ///
    /// One critical section per question: marks every existing version
    /// non-current, computes `version = count + 1`, inserts the new answer as
    /// current. Concurrent revisions serialize on the lineage lock, so at
    /// most one answer per question is ever current.
    pub fn create_revision(
        &self,
        question_id: QuestionId,
        author: UserId,
        text: impl Into<String>,
        sources: Vec<String>,
    ) -> Result<Answer, StoreError> {
        if !self.questions.contains_key(&question_id) {
            return Err(StoreError::QuestionNotFound(question_id));
        }

        let chain_entry = self.lineage.entry(question_id).or_default();
        let mut chain = chain_entry.lock();

        for id in chain.iter() {
            if let Some(mut prior) = self.answers.get_mut(id) {
                prior.is_current = false;
            }
        }

        let answer = Answer {
            id: AnswerId::new(),
            question_id,
            author,
            text: text.into(),
            sources,
            version: u32::try_from(chain.len()).unwrap_or(u32::MAX).saturating_add(1),
            is_current: true,
            created_at: Utc::now(),
        };
        self.answers.insert(answer.id, answer.clone());
        chain.push(answer.id);

        tracing::debug!(
            question = %question_id,
            version = answer.version,
            author = %author,
            "answer revision created"
        );
        Ok(answer)
    }

    /// The single authoritative answer for a question
    pub fn current_answer(&self, question_id: QuestionId) -> Result<Answer, StoreError> {
        let chain_entry = self
            .lineage
            .get(&question_id)
            .ok_or(StoreError::NoCurrentAnswer(question_id))?;
        let chain = chain_entry.lock();
        let last = *chain.last().ok_or(StoreError::NoCurrentAnswer(question_id))?;
        drop(chain);
        drop(chain_entry);
        self.answer(last)
    }

    /// All answer versions for a question, oldest first
    #[must_use]
    pub fn answer_versions(&self, question_id: QuestionId) -> Vec<Answer> {
        let Some(chain_entry) = self.lineage.get(&question_id) else {
            return Vec::new();
        };
        let ids: Vec<AnswerId> = chain_entry.lock().clone();
        drop(chain_entry);
        ids.iter()
            .filter_map(|id| self.answers.get(id).map(|a| a.clone()))
            .collect()
    }

    /// Number of answers a user has authored
    #[must_use]
    pub fn answers_authored_by(&self, user: UserId) -> usize {
        self.answers.iter().filter(|a| a.author == user).count()
    }

    // --- peer validations ---

    /// Append a peer verdict to the question's audit trail
    pub fn record_peer_validation(&self, record: PeerValidation) {
        self.peer_validations
            .entry(record.question_id)
            .or_default()
            .push(record);
    }

    /// Peer verdict audit trail for a question, oldest first
    #[must_use]
    pub fn peer_validations(&self, question_id: QuestionId) -> Vec<PeerValidation> {
        self.peer_validations
            .get(&question_id)
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    /// Number of peer reviews a user has submitted
    #[must_use]
    pub fn reviews_by(&self, user: UserId) -> usize {
        self.peer_validations
            .iter()
            .map(|entry| entry.iter().filter(|pv| pv.reviewer == user).count())
            .sum()
    }

    // --- moderator validations ---

    /// Record a moderator verdict, enforcing (answer, moderator) uniqueness
    ///
    /// The sequence ordinal is assigned under the per-answer entry guard so
    /// concurrent verdicts on the same answer cannot collide.
    pub fn record_validation(
        &self,
        question_id: QuestionId,
        answer_id: AnswerId,
        moderator: UserId,
        verdict: ModeratorVerdict,
        comments: Option<String>,
    ) -> Result<Validation, StoreError> {
        let id = ValidationId::new();
        match self.validation_index.entry((answer_id, moderator)) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(StoreError::DuplicateValidation {
                    answer: answer_id,
                    moderator,
                });
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let mut records = self.validations.entry(answer_id).or_default();
        let validation = Validation {
            id,
            question_id,
            answer_id,
            moderator,
            verdict,
            comments,
            sequence: u32::try_from(records.len()).unwrap_or(u32::MAX).saturating_add(1),
            created_at: Utc::now(),
        };
        records.push(validation.clone());
        Ok(validation)
    }

    /// Moderator verdicts for an answer, oldest first
    #[must_use]
    pub fn validations_for(&self, answer_id: AnswerId) -> Vec<Validation> {
        self.validations
            .get(&answer_id)
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    // --- golden FAQs ---

    /// Publish a golden FAQ; at most one per question
    pub fn insert_faq(&self, faq: GoldenFaq) -> Result<FaqId, StoreError> {
        match self.faq_by_question.entry(faq.question_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(StoreError::DuplicateFaq(faq.question_id))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(faq.id);
                let id = faq.id;
                self.faqs.insert(id, faq);
                Ok(id)
            }
        }
    }

    /// Fetch a golden FAQ
    pub fn faq(&self, id: FaqId) -> Result<GoldenFaq, StoreError> {
        self.faqs
            .get(&id)
            .map(|f| f.clone())
            .ok_or(StoreError::FaqNotFound(id))
    }

    /// All published FAQs
    #[must_use]
    pub fn list_faqs(&self) -> Vec<GoldenFaq> {
        self.faqs.iter().map(|f| f.clone()).collect()
    }

    /// The golden FAQ derived from a question, if published
    #[must_use]
    pub fn faq_for_question(&self, question_id: QuestionId) -> Option<GoldenFaq> {
        let id = *self.faq_by_question.get(&question_id)?;
        self.faqs.get(&id).map(|f| f.clone())
    }

    /// Bump the view counter under the entry guard
    pub fn record_faq_view(&self, id: FaqId) -> Result<u64, StoreError> {
        let mut faq = self.faqs.get_mut(&id).ok_or(StoreError::FaqNotFound(id))?;
        faq.view_count += 1;
        Ok(faq.view_count)
    }

    /// FAQs published by a user
    #[must_use]
    pub fn faqs_published_by(&self, user: UserId) -> usize {
        self.faqs.iter().filter(|f| f.created_by == user).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrofaq_model::Classification;
    use std::sync::Arc;

    fn seed_question(store: &WorkflowStore) -> QuestionId {
        store.insert_question(Question::new("Best time to sow wheat?", Classification::default()))
    }

    #[test]
    fn revision_versions_are_monotonic_and_exclusive() {
        let store = WorkflowStore::new();
        let q = seed_question(&store);
        let author = UserId::new();

        let v1 = store.create_revision(q, author, "November", vec![]).unwrap();
        assert_eq!(v1.version, 1);
        assert!(v1.is_current);

        let v2 = store.create_revision(q, author, "Early November", vec![]).unwrap();
        assert_eq!(v2.version, 2);

        let versions = store.answer_versions(q);
        assert_eq!(versions.len(), 2);
        let current: Vec<_> = versions.iter().filter(|a| a.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, v2.id);
        assert_eq!(store.current_answer(q).unwrap().id, v2.id);
    }

    #[test]
    fn concurrent_revisions_keep_exactly_one_current() {
        let store = Arc::new(WorkflowStore::new());
        let q = seed_question(&store);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                store
                    .create_revision(q, UserId::new(), format!("draft {i}"), vec![])
                    .unwrap();
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let versions = store.answer_versions(q);
        assert_eq!(versions.len(), 8);
        assert_eq!(versions.iter().filter(|a| a.is_current).count(), 1);
        let mut seen: Vec<u32> = versions.iter().map(|a| a.version).collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn revision_requires_existing_question() {
        let store = WorkflowStore::new();
        let err = store
            .create_revision(QuestionId::new(), UserId::new(), "text", vec![])
            .unwrap_err();
        assert!(matches!(err, StoreError::QuestionNotFound(_)));
    }

    #[test]
    fn no_current_answer_before_first_version() {
        let store = WorkflowStore::new();
        let q = seed_question(&store);
        assert!(matches!(
            store.current_answer(q),
            Err(StoreError::NoCurrentAnswer(_))
        ));
    }

    #[test]
    fn duplicate_moderator_validation_rejected() {
        let store = WorkflowStore::new();
        let q = seed_question(&store);
        let answer = store.create_revision(q, UserId::new(), "text", vec![]).unwrap();
        let moderator = UserId::new();

        let first = store
            .record_validation(q, answer.id, moderator, ModeratorVerdict::Valid, None)
            .unwrap();
        assert_eq!(first.sequence, 1);

        let err = store
            .record_validation(q, answer.id, moderator, ModeratorVerdict::Valid, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateValidation { .. }));
        assert_eq!(store.validations_for(answer.id).len(), 1);
    }

    #[test]
    fn validation_sequence_is_per_answer() {
        let store = WorkflowStore::new();
        let q = seed_question(&store);
        let answer = store.create_revision(q, UserId::new(), "text", vec![]).unwrap();

        let a = store
            .record_validation(q, answer.id, UserId::new(), ModeratorVerdict::Invalid, Some("x".into()))
            .unwrap();
        let b = store
            .record_validation(q, answer.id, UserId::new(), ModeratorVerdict::Valid, None)
            .unwrap();
        assert_eq!((a.sequence, b.sequence), (1, 2));
    }

    #[test]
    fn one_faq_per_question() {
        let store = WorkflowStore::new();
        let q = seed_question(&store);
        let answer = store.create_revision(q, UserId::new(), "text", vec![]).unwrap();

        let faq = GoldenFaq {
            id: FaqId::new(),
            question_id: q,
            answer_id: answer.id,
            created_by: answer.author,
            view_count: 0,
            created_at: Utc::now(),
        };
        let id = store.insert_faq(faq.clone()).unwrap();

        let dup = GoldenFaq { id: FaqId::new(), ..faq };
        assert!(matches!(store.insert_faq(dup), Err(StoreError::DuplicateFaq(_))));

        assert_eq!(store.record_faq_view(id).unwrap(), 1);
        assert_eq!(store.record_faq_view(id).unwrap(), 2);
        assert_eq!(store.faq_for_question(q).unwrap().id, id);
    }

    #[test]
    fn status_counts_group_questions() {
        let store = WorkflowStore::new();
        seed_question(&store);
        seed_question(&store);
        let counts = store.status_counts();
        assert_eq!(counts[&QuestionStatus::PendingAssignment], 2);
    }
}
