//! Moderation gate
//!
//! Single-moderator final validity check. The verdict is binary and terminal
//! per submission: no streaks, no re-validation by the same moderator (the
//! store's (answer, moderator) uniqueness index rejects repeats).

use crate::event::WorkflowEvent;
use agrofaq_model::ModeratorVerdict;

/// The lifecycle event a moderation verdict produces
#[inline]
#[must_use]
pub fn moderation_event(verdict: ModeratorVerdict) -> WorkflowEvent {
    match verdict {
        ModeratorVerdict::Valid => WorkflowEvent::ModeratedValid,
        ModeratorVerdict::Invalid => WorkflowEvent::ModeratedInvalid,
    }
}

/// The question's `valid_count` after the verdict
#[inline]
#[must_use]
pub fn valid_count_after(verdict: ModeratorVerdict) -> u32 {
    match verdict {
        ModeratorVerdict::Valid => 1,
        ModeratorVerdict::Invalid => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdicts_map_to_events() {
        assert_eq!(
            moderation_event(ModeratorVerdict::Valid),
            WorkflowEvent::ModeratedValid
        );
        assert_eq!(
            moderation_event(ModeratorVerdict::Invalid),
            WorkflowEvent::ModeratedInvalid
        );
    }

    #[test]
    fn valid_count_is_binary() {
        assert_eq!(valid_count_after(ModeratorVerdict::Valid), 1);
        assert_eq!(valid_count_after(ModeratorVerdict::Invalid), 0);
    }
}
