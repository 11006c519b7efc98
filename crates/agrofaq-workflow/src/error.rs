//! Error taxonomy for workflow operations
//!
//! Every operation failure is one of five categories, recovered at the
//! operation boundary and returned to the caller as a structured failure.
//! Nothing here crashes the process.

use agrofaq_model::{DraftError, Role};
use agrofaq_store::StoreError;

/// Caller-facing workflow failure
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Malformed or missing input; rejected before any state mutation
    #[error("invalid input: {0}")]
    Validation(String),

    /// Actor lacks the role or is not the designated assignee/reviewer
    #[error("not permitted: {0}")]
    Authorization(String),

    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("question", "answer", ...)
        entity: &'static str,
        /// Stringified id
        id: String,
    },

    /// Requested transition is invalid for the entity's current state
    #[error("state conflict: {0}")]
    StateConflict(String),

    /// No eligible worker of the required role is available
    #[error("no available {role} to assign")]
    CapacityUnavailable {
        /// The role that had no capacity
        role: Role,
    },
}

/// Error category, distinguishable by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authorization,
    NotFound,
    StateConflict,
    CapacityUnavailable,
}

impl WorkflowError {
    /// Category of this error
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StateConflict(_) => ErrorKind::StateConflict,
            Self::CapacityUnavailable { .. } => ErrorKind::CapacityUnavailable,
        }
    }

    /// Whether retrying the same call later can succeed without any input
    /// change (capacity may free up; everything else needs a different call)
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CapacityUnavailable { .. })
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::QuestionNotFound(id) => Self::NotFound {
                entity: "question",
                id: id.to_string(),
            },
            StoreError::AnswerNotFound(id) => Self::NotFound {
                entity: "answer",
                id: id.to_string(),
            },
            StoreError::UserNotFound(id) => Self::NotFound {
                entity: "user",
                id: id.to_string(),
            },
            StoreError::FaqNotFound(id) => Self::NotFound {
                entity: "golden FAQ",
                id: id.to_string(),
            },
            StoreError::NoCurrentAnswer(id) => {
                Self::StateConflict(format!("question {id} has no answer to act on"))
            }
            StoreError::DuplicateValidation { answer, moderator } => Self::StateConflict(format!(
                "moderator {moderator} already validated answer {answer}"
            )),
            StoreError::DuplicateFaq(id) => {
                Self::StateConflict(format!("question {id} already has a golden FAQ"))
            }
        }
    }
}

impl From<DraftError> for WorkflowError {
    fn from(err: DraftError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrofaq_model::QuestionId;

    #[test]
    fn kinds_are_distinguishable() {
        let err = WorkflowError::Authorization("not the assignee".into());
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(!err.is_retryable());

        let err = WorkflowError::CapacityUnavailable {
            role: Role::Moderator,
        };
        assert_eq!(err.kind(), ErrorKind::CapacityUnavailable);
        assert!(err.is_retryable());
    }

    #[test]
    fn store_errors_map_to_categories() {
        let id = QuestionId::new();
        let err = WorkflowError::from(StoreError::QuestionNotFound(id));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains(&id.to_string()));

        let err = WorkflowError::from(StoreError::NoCurrentAnswer(id));
        assert_eq!(err.kind(), ErrorKind::StateConflict);
    }

    #[test]
    fn draft_errors_are_validation() {
        let err = WorkflowError::from(DraftError::MissingField("comments"));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("comments"));
    }
}
