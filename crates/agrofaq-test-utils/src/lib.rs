//! Testing utilities for the AgroFAQ workspace
//!
//! Shared fixtures and scenario helpers.

#![allow(missing_docs)]

use agrofaq_engine::Engine;
use agrofaq_model::{Actor, AnswerDraft, QuestionDraft, Role, UserId, WorkflowConfig};
use agrofaq_store::UserRecord;
use std::sync::Arc;

/// Personnel registered by [`setup_engine`], in registration order
pub struct Roster {
    pub specialists: Vec<Arc<UserRecord>>,
    pub moderators: Vec<Arc<UserRecord>>,
}

impl Roster {
    /// First registered specialist who is not `user`, as an acting identity
    pub fn specialist_other_than(&self, user: UserId) -> Actor {
        let record = self
            .specialists
            .iter()
            .find(|r| r.id != user)
            .expect("roster holds no other specialist");
        Actor::new(record.id, Role::AgriSpecialist)
    }
}

/// Route `tracing` output through the test harness capture
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine with a seeded selector RNG and a pre-registered roster
///
/// The fixed seed makes assignment tie-breaking reproducible across runs.
pub fn setup_engine(specialists: usize, moderators: usize) -> (Arc<Engine>, Roster) {
    init_tracing();
    let engine = Arc::new(Engine::new(WorkflowConfig::default()).with_rng_seed(42));
    let roster = Roster {
        specialists: (0..specialists)
            .map(|i| {
                engine
                    .directory()
                    .add_user(format!("specialist-{i}"), Role::AgriSpecialist)
            })
            .collect(),
        moderators: (0..moderators)
            .map(|i| {
                engine
                    .directory()
                    .add_user(format!("moderator-{i}"), Role::Moderator)
            })
            .collect(),
    };
    (engine, roster)
}

pub fn wheat_question() -> QuestionDraft {
    QuestionDraft::new("Best time to sow wheat?")
}

pub fn wheat_answer() -> AnswerDraft {
    AnswerDraft::new("Sow in early November once soil temperature drops below 20C.")
        .with_sources(vec!["ICAR wheat cultivation guide".into()])
}

/// Drain the outbox to quiescence, including jobs enqueued by other jobs
///
/// Bounded so a persistently failing retryable job cannot spin the test
/// forever; returns the total number of jobs that executed successfully.
pub async fn drain_outbox(engine: &Engine) -> usize {
    let mut total = 0;
    for _ in 0..32 {
        if engine.outbox().is_empty() {
            break;
        }
        total += engine.run_outbox_once().await;
    }
    total
}
