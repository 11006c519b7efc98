//! AgroFAQ Model - shared data model for the review workflow
//!
//! Defines the fundamental types of the workflow engine:
//! - Opaque ULID-based entity ids
//! - Entities (questions, answers, verdicts, users, notifications)
//! - Lifecycle statuses, roles, and verdict enums
//! - Workflow configuration
//! - Operation drafts with self-validation
//!
//! Entities reference each other only through ids so the store layer can
//! keep flat arenas and join explicitly.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod dto;
pub mod entities;
pub mod ids;
pub mod status;

// Re-exports for convenience
pub use config::WorkflowConfig;
pub use dto::{
    Actor, AnswerDraft, DraftError, FaqFilter, ModerationDraft, PeerVerdictDraft, QuestionDraft,
};
pub use entities::{
    Answer, Classification, GoldenFaq, Notification, PeerValidation, Question, RelatedEntity,
    User, Validation,
};
pub use ids::{AnswerId, FaqId, NotificationId, QuestionId, UserId, ValidationId};
pub use status::{ModeratorVerdict, NotificationKind, PeerVerdict, QuestionStatus, Role};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the AgroFAQ model
    pub use crate::{
        Actor, Answer, AnswerDraft, AnswerId, Classification, GoldenFaq, ModerationDraft,
        ModeratorVerdict, Notification, NotificationKind, PeerValidation, PeerVerdict,
        PeerVerdictDraft, Question, QuestionDraft, QuestionId, QuestionStatus, Role, User, UserId,
        WorkflowConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
