//! End-to-end lifecycle scenarios driven through the engine and its outbox.

use agrofaq_engine::{Engine, ModerationOutcome, PeerReviewOutcome};
use agrofaq_model::{
    Actor, Classification, FaqFilter, ModerationDraft, PeerVerdictDraft, QuestionDraft,
    QuestionId, QuestionStatus, Role,
};
use agrofaq_test_utils::{drain_outbox, setup_engine, wheat_answer, wheat_question};
use pretty_assertions::assert_eq;

/// Drive a question through assignment, answering, and the full approval
/// streak, leaving it in `PendingModeration` with a moderator assigned.
/// Returns the question id and the answer author's actor.
async fn drive_to_moderation(engine: &Engine) -> (QuestionId, Actor) {
    let id = engine.submit_question(wheat_question()).await.unwrap();
    drain_outbox(engine).await;

    let q = engine.store().question(id).unwrap();
    let author = Actor::new(q.assigned_specialist.unwrap(), Role::AgriSpecialist);
    engine.submit_answer(id, wheat_answer(), author).await.unwrap();
    drain_outbox(engine).await;

    for _ in 0..3 {
        let q = engine.store().question(id).unwrap();
        let reviewer = Actor::new(q.active_reviewer.unwrap(), Role::AgriSpecialist);
        engine
            .submit_peer_verdict(id, PeerVerdictDraft::approve(), reviewer)
            .await
            .unwrap();
        drain_outbox(engine).await;
    }

    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::PendingModeration);
    assert!(q.assigned_moderator.is_some());
    (id, author)
}

#[tokio::test]
async fn question_reaches_golden_faq_through_three_approvals() {
    let (engine, _roster) = setup_engine(5, 1);
    let (id, author) = drive_to_moderation(&engine).await;

    let q = engine.store().question(id).unwrap();
    let moderator = Actor::new(q.assigned_moderator.unwrap(), Role::Moderator);
    let outcome = engine
        .submit_moderation_verdict(id, ModerationDraft::valid(), moderator)
        .await
        .unwrap();
    assert_eq!(outcome, ModerationOutcome::ReadyForGoldenFaq);
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::ReadyForGoldenFaq);
    assert_eq!(q.valid_count, 1);

    let faq = engine.create_golden_faq(id, author).await.unwrap();
    assert_eq!(faq.created_by, author.id);
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::GoldenFaqCreated);

    let faqs = engine.list_golden_faqs(&FaqFilter::any()).await;
    assert_eq!(faqs.len(), 1);
    assert_eq!(faqs[0].faq.id, faq.id);
    assert_eq!(faqs[0].question_text, "Best time to sow wheat?");
}

#[tokio::test]
async fn every_assignment_returns_its_workload() {
    let (engine, roster) = setup_engine(5, 1);
    let (id, author) = drive_to_moderation(&engine).await;

    let q = engine.store().question(id).unwrap();
    let moderator = Actor::new(q.assigned_moderator.unwrap(), Role::Moderator);
    engine
        .submit_moderation_verdict(id, ModerationDraft::valid(), moderator)
        .await
        .unwrap();
    engine.create_golden_faq(id, author).await.unwrap();
    drain_outbox(&engine).await;

    for record in &roster.specialists {
        assert_eq!(record.workload(), 0, "specialist {} still holds work", record.name);
    }
    for record in &roster.moderators {
        assert_eq!(record.workload(), 0, "moderator {} still holds work", record.name);
    }
}

#[tokio::test]
async fn reviewer_revision_resets_the_streak_and_takes_over_authorship() {
    let (engine, _roster) = setup_engine(5, 1);
    let id = engine.submit_question(wheat_question()).await.unwrap();
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    let original_author = Actor::new(q.assigned_specialist.unwrap(), Role::AgriSpecialist);
    engine
        .submit_answer(id, wheat_answer(), original_author)
        .await
        .unwrap();
    drain_outbox(&engine).await;

    // First reviewer approves, second reviewer rewrites the answer.
    let q = engine.store().question(id).unwrap();
    let first = Actor::new(q.active_reviewer.unwrap(), Role::AgriSpecialist);
    let outcome = engine
        .submit_peer_verdict(id, PeerVerdictDraft::approve(), first)
        .await
        .unwrap();
    assert!(matches!(outcome, PeerReviewOutcome::StreakAdvanced { streak: 1 }));
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    let second = Actor::new(q.active_reviewer.unwrap(), Role::AgriSpecialist);
    let outcome = engine
        .submit_peer_verdict(
            id,
            PeerVerdictDraft::revise("cite the sowing window", "Sow from late October."),
            second,
        )
        .await
        .unwrap();

    let PeerReviewOutcome::RevisionCreated { answer } = outcome else {
        panic!("expected a revision");
    };
    assert_eq!(answer.author, second.id);
    assert_eq!(answer.version, 2);
    assert!(answer.is_current);

    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::PendingPeerReview);
    assert_eq!(q.consecutive_peer_approvals, 0);
    assert_eq!(engine.store().current_answer(id).unwrap().id, answer.id);
}

#[tokio::test]
async fn reviewer_assignments_never_hit_authors_or_past_reviewers() {
    let (engine, _roster) = setup_engine(5, 1);
    let id = engine.submit_question(wheat_question()).await.unwrap();
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    let author = Actor::new(q.assigned_specialist.unwrap(), Role::AgriSpecialist);
    engine.submit_answer(id, wheat_answer(), author).await.unwrap();
    drain_outbox(&engine).await;

    let mut seen_reviewers = Vec::new();
    for _ in 0..3 {
        let q = engine.store().question(id).unwrap();
        let reviewer_id = q.active_reviewer.unwrap();
        assert_ne!(reviewer_id, author.id);
        assert!(
            !seen_reviewers.contains(&reviewer_id),
            "reviewer assigned twice to the same question"
        );
        seen_reviewers.push(reviewer_id);

        let reviewer = Actor::new(reviewer_id, Role::AgriSpecialist);
        engine
            .submit_peer_verdict(id, PeerVerdictDraft::approve(), reviewer)
            .await
            .unwrap();
        drain_outbox(&engine).await;
    }

    assert_eq!(seen_reviewers.len(), 3);
    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::PendingModeration);
}

#[tokio::test]
async fn exhausted_reviewer_pool_promotes_straight_to_moderation() {
    // Two specialists: one authors, one reviews, then nobody is left.
    let (engine, _roster) = setup_engine(2, 1);
    let id = engine.submit_question(wheat_question()).await.unwrap();
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    let author = Actor::new(q.assigned_specialist.unwrap(), Role::AgriSpecialist);
    engine.submit_answer(id, wheat_answer(), author).await.unwrap();
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    let reviewer = Actor::new(q.active_reviewer.unwrap(), Role::AgriSpecialist);
    engine
        .submit_peer_verdict(id, PeerVerdictDraft::approve(), reviewer)
        .await
        .unwrap();
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::PendingModeration);
    assert_eq!(q.consecutive_peer_approvals, 1);
    assert!(q.assigned_moderator.is_some());
}

#[tokio::test]
async fn invalid_verdict_sends_the_answer_back_to_its_author() {
    let (engine, _roster) = setup_engine(5, 1);
    let (id, author) = drive_to_moderation(&engine).await;

    let q = engine.store().question(id).unwrap();
    let moderator = Actor::new(q.assigned_moderator.unwrap(), Role::Moderator);
    let outcome = engine
        .submit_moderation_verdict(id, ModerationDraft::invalid("claim lacks a source"), moderator)
        .await
        .unwrap();
    assert_eq!(outcome, ModerationOutcome::NeedsRevision);
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::NeedsRevision);
    assert_eq!(q.valid_count, 0);
    assert_eq!(q.assigned_specialist, Some(author.id));

    // The moderator's comments reach the author.
    let revision_note = engine
        .notifications()
        .all_for(author.id)
        .into_iter()
        .find(|n| n.kind == agrofaq_model::NotificationKind::RevisionRequested)
        .unwrap();
    assert!(revision_note.message.contains("claim lacks a source"));

    // The author resubmits and the review loop starts over.
    engine
        .submit_answer(id, wheat_answer().with_sources(vec!["field trial data".into()]), author)
        .await
        .unwrap();
    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::PendingPeerReview);
    assert_eq!(q.consecutive_peer_approvals, 0);

    let versions = engine.store().answer_versions(id);
    assert_eq!(versions.last().unwrap().version, versions.len() as u32);
}

#[tokio::test]
async fn second_moderation_round_reassigns_the_moderator() {
    // Seven specialists: one author plus three fresh reviewers per round.
    let (engine, roster) = setup_engine(7, 1);
    let (id, author) = drive_to_moderation(&engine).await;
    let moderator_record = &roster.moderators[0];

    let q = engine.store().question(id).unwrap();
    let moderator = Actor::new(q.assigned_moderator.unwrap(), Role::Moderator);
    engine
        .submit_moderation_verdict(id, ModerationDraft::invalid("needs a citation"), moderator)
        .await
        .unwrap();
    drain_outbox(&engine).await;

    // The rejection releases the moderation claim.
    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::NeedsRevision);
    assert_eq!(q.assigned_moderator, None);
    assert_eq!(moderator_record.workload(), 0);

    engine
        .submit_answer(
            id,
            wheat_answer().with_sources(vec!["ICAR bulletin 12".into()]),
            author,
        )
        .await
        .unwrap();
    drain_outbox(&engine).await;

    // Three fresh reviewers approve the revised answer.
    for _ in 0..3 {
        let q = engine.store().question(id).unwrap();
        let reviewer = Actor::new(q.active_reviewer.unwrap(), Role::AgriSpecialist);
        engine
            .submit_peer_verdict(id, PeerVerdictDraft::approve(), reviewer)
            .await
            .unwrap();
        drain_outbox(&engine).await;
    }

    // The moderator holds a fresh claim, a fresh task record, and exactly
    // one open unit of workload for it.
    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::PendingModeration);
    assert_eq!(q.assigned_moderator, Some(moderator_record.id));
    assert_eq!(moderator_record.workload(), 1);
    let moderation_notices = engine
        .notifications()
        .all_for(moderator_record.id)
        .into_iter()
        .filter(|n| n.kind == agrofaq_model::NotificationKind::ModerationAssigned)
        .count();
    assert_eq!(moderation_notices, 2);

    let moderator = Actor::new(q.assigned_moderator.unwrap(), Role::Moderator);
    engine
        .submit_moderation_verdict(id, ModerationDraft::valid(), moderator)
        .await
        .unwrap();
    engine.create_golden_faq(id, author).await.unwrap();
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    assert_eq!(q.status, QuestionStatus::GoldenFaqCreated);
    for record in roster.specialists.iter().chain(&roster.moderators) {
        assert_eq!(record.workload(), 0, "{} still holds work", record.name);
    }
}

#[tokio::test]
async fn incentives_follow_the_moderation_verdict() {
    let (engine, _roster) = setup_engine(5, 1);
    let (id, author) = drive_to_moderation(&engine).await;

    let q = engine.store().question(id).unwrap();
    let moderator = Actor::new(q.assigned_moderator.unwrap(), Role::Moderator);
    engine
        .submit_moderation_verdict(id, ModerationDraft::valid(), moderator)
        .await
        .unwrap();

    let snapshot = engine.directory().require(author.id).unwrap().snapshot();
    assert_eq!(snapshot.incentive_points, 10);
    assert_eq!(snapshot.penalty, 0);

    engine.create_golden_faq(id, author).await.unwrap();
    let stats = engine.get_dashboard_stats(author).await.unwrap();
    assert_eq!(stats.faqs_published, 1);
    assert!(stats.answers_authored >= 1);
    assert_eq!(
        stats.questions_by_status[&QuestionStatus::GoldenFaqCreated],
        1
    );
}

#[tokio::test]
async fn faq_listing_filters_by_classification_and_counts_views() {
    let (engine, _roster) = setup_engine(5, 1);

    let draft = QuestionDraft::new("Best time to sow wheat?").with_classification(Classification {
        crop: Some("Winter Wheat".into()),
        region: Some("Punjab".into()),
        season: Some("rabi".into()),
        category: None,
    });
    let id = engine.submit_question(draft).await.unwrap();
    drain_outbox(&engine).await;

    let q = engine.store().question(id).unwrap();
    let author = Actor::new(q.assigned_specialist.unwrap(), Role::AgriSpecialist);
    engine.submit_answer(id, wheat_answer(), author).await.unwrap();
    drain_outbox(&engine).await;
    for _ in 0..3 {
        let q = engine.store().question(id).unwrap();
        let reviewer = Actor::new(q.active_reviewer.unwrap(), Role::AgriSpecialist);
        engine
            .submit_peer_verdict(id, PeerVerdictDraft::approve(), reviewer)
            .await
            .unwrap();
        drain_outbox(&engine).await;
    }
    let q = engine.store().question(id).unwrap();
    let moderator = Actor::new(q.assigned_moderator.unwrap(), Role::Moderator);
    engine
        .submit_moderation_verdict(id, ModerationDraft::valid(), moderator)
        .await
        .unwrap();
    let faq = engine.create_golden_faq(id, author).await.unwrap();
    drain_outbox(&engine).await;

    let wheat_filter = FaqFilter {
        crop: Some("wheat".into()),
        ..FaqFilter::any()
    };
    assert_eq!(engine.list_golden_faqs(&wheat_filter).await.len(), 1);

    let rice_filter = FaqFilter {
        crop: Some("rice".into()),
        ..FaqFilter::any()
    };
    assert!(engine.list_golden_faqs(&rice_filter).await.is_empty());

    assert_eq!(engine.record_faq_view(faq.id).await.unwrap(), 1);
    assert_eq!(engine.record_faq_view(faq.id).await.unwrap(), 2);

}
