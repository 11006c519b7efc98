//! Error types for the store layer

use agrofaq_model::{AnswerId, FaqId, QuestionId, UserId};

/// Store-level failure
///
/// Lookup misses and uniqueness violations surface here; the workflow layer
/// maps them onto its caller-facing taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Referenced question does not exist
    #[error("question not found: {0}")]
    QuestionNotFound(QuestionId),

    /// Referenced answer does not exist
    #[error("answer not found: {0}")]
    AnswerNotFound(AnswerId),

    /// Referenced user does not exist
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Referenced golden FAQ does not exist
    #[error("golden FAQ not found: {0}")]
    FaqNotFound(FaqId),

    /// Question has no answer versions yet
    #[error("question {0} has no current answer")]
    NoCurrentAnswer(QuestionId),

    /// (answer, moderator) uniqueness violated
    #[error("moderator {moderator} already validated answer {answer}")]
    DuplicateValidation {
        /// The answer in question
        answer: AnswerId,
        /// The repeating moderator
        moderator: UserId,
    },

    /// A golden FAQ already exists for this question
    #[error("question {0} already has a golden FAQ")]
    DuplicateFaq(QuestionId),
}
