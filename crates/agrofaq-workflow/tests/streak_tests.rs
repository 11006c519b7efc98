use agrofaq_model::{PeerVerdict, WorkflowConfig};
use agrofaq_workflow::{PeerReviewPolicy, WorkflowEvent};
use proptest::prelude::*;

fn policy() -> PeerReviewPolicy {
    PeerReviewPolicy::from_config(&WorkflowConfig::default())
}

fn verdict_strategy() -> impl Strategy<Value = PeerVerdict> {
    prop_oneof![Just(PeerVerdict::Approved), Just(PeerVerdict::Revised)]
}

proptest! {
    #[test]
    fn prop_streak_counts_trailing_approvals(
        verdicts in proptest::collection::vec(verdict_strategy(), 0..40)
    ) {
        let policy = policy();
        let mut streak = 0;
        for verdict in &verdicts {
            streak = policy.next_streak(*verdict, streak);
        }

        let trailing_approvals = verdicts
            .iter()
            .rev()
            .take_while(|v| **v == PeerVerdict::Approved)
            .count() as u32;
        prop_assert_eq!(streak, trailing_approvals);
    }

    #[test]
    fn prop_any_revision_zeroes_the_streak(streak in 0u32..100) {
        let policy = policy();
        prop_assert_eq!(policy.next_streak(PeerVerdict::Revised, streak), 0);
        prop_assert_eq!(
            policy.event_for(PeerVerdict::Revised, 0),
            WorkflowEvent::PeerRevised
        );
    }

    #[test]
    fn prop_promotion_needs_the_full_streak(streak in 0u32..10) {
        let policy = policy();
        let next = policy.next_streak(PeerVerdict::Approved, streak);
        let event = policy.event_for(PeerVerdict::Approved, next);
        match event {
            WorkflowEvent::PeerApproved { streak_complete } => {
                prop_assert_eq!(streak_complete, next >= policy.required_approvals);
            }
            other => prop_assert!(false, "unexpected event {}", other),
        }
    }
}
