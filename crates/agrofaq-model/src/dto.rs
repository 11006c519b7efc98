//! Operation input types
//!
//! The external I/O layer (HTTP routing, CSV ingestion) hands the engine
//! already-decoded drafts plus an authenticated [`Actor`]. Drafts validate
//! themselves before any state is touched; a failed validation must never
//! mutate anything.

use crate::ids::UserId;
use crate::status::{ModeratorVerdict, PeerVerdict, Role};
use crate::Classification;
use serde::{Deserialize, Serialize};

/// Draft-level validation failure
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    /// A required field is empty or missing
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),
    /// A field is present but does not make sense for the verdict
    #[error("invalid field: {0}")]
    InvalidField(&'static str),
}

/// Authenticated caller identity, produced by the external credential layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id
    pub id: UserId,
    /// Verified role
    pub role: Role,
}

impl Actor {
    /// Create an actor identity
    #[inline]
    #[must_use]
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// A question to submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    /// Question text
    pub text: String,
    /// Optional agronomic classification
    #[serde(default)]
    pub classification: Classification,
    /// Submitter identity (free text from the external layer)
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl QuestionDraft {
    /// Create a draft with bare text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            classification: Classification::default(),
            submitted_by: None,
        }
    }

    /// With classification
    #[inline]
    #[must_use]
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Validate the draft
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.text.trim().is_empty() {
            return Err(DraftError::MissingField("text"));
        }
        Ok(())
    }
}

/// An answer (initial or revision) to submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDraft {
    /// Answer body
    pub text: String,
    /// Cited sources
    #[serde(default)]
    pub sources: Vec<String>,
}

impl AnswerDraft {
    /// Create a draft
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }

    /// With sources
    #[inline]
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Validate the draft
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.text.trim().is_empty() {
            return Err(DraftError::MissingField("text"));
        }
        Ok(())
    }
}

/// A peer verdict to submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerVerdictDraft {
    /// Approve or revise
    pub verdict: PeerVerdict,
    /// Reviewer comments (required for `Revised`)
    #[serde(default)]
    pub comments: Option<String>,
    /// Replacement answer text (required for `Revised`)
    #[serde(default)]
    pub revised_answer_text: Option<String>,
}

impl PeerVerdictDraft {
    /// Approve the current answer
    #[must_use]
    pub fn approve() -> Self {
        Self {
            verdict: PeerVerdict::Approved,
            comments: None,
            revised_answer_text: None,
        }
    }

    /// Request a revision with a replacement text
    #[must_use]
    pub fn revise(comments: impl Into<String>, revised_text: impl Into<String>) -> Self {
        Self {
            verdict: PeerVerdict::Revised,
            comments: Some(comments.into()),
            revised_answer_text: Some(revised_text.into()),
        }
    }

    /// Validate the draft: `Revised` requires both comments and text
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.verdict == PeerVerdict::Revised {
            if self.comments.as_deref().map_or(true, |c| c.trim().is_empty()) {
                return Err(DraftError::MissingField("comments"));
            }
            if self
                .revised_answer_text
                .as_deref()
                .map_or(true, |t| t.trim().is_empty())
            {
                return Err(DraftError::MissingField("revised_answer_text"));
            }
        }
        Ok(())
    }
}

/// A moderation verdict to submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationDraft {
    /// Valid or invalid
    pub verdict: ModeratorVerdict,
    /// Moderator comments (relayed to the specialist on `Invalid`)
    #[serde(default)]
    pub comments: Option<String>,
}

impl ModerationDraft {
    /// Mark valid
    #[must_use]
    pub fn valid() -> Self {
        Self {
            verdict: ModeratorVerdict::Valid,
            comments: None,
        }
    }

    /// Mark invalid with comments
    #[must_use]
    pub fn invalid(comments: impl Into<String>) -> Self {
        Self {
            verdict: ModeratorVerdict::Invalid,
            comments: Some(comments.into()),
        }
    }

    /// Validate the draft: `Invalid` requires comments for the specialist
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.verdict == ModeratorVerdict::Invalid
            && self.comments.as_deref().map_or(true, |c| c.trim().is_empty())
        {
            return Err(DraftError::MissingField("comments"));
        }
        Ok(())
    }
}

/// Golden FAQ listing filter; empty fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqFilter {
    /// Case-insensitive crop substring
    pub crop: Option<String>,
    /// Case-insensitive region substring
    pub region: Option<String>,
    /// Case-insensitive season substring
    pub season: Option<String>,
    /// Case-insensitive category substring
    pub category: Option<String>,
}

impl FaqFilter {
    /// Filter that matches every FAQ
    #[inline]
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Whether a classification matches this filter
    #[must_use]
    pub fn matches(&self, classification: &Classification) -> bool {
        fn field_matches(filter: &Option<String>, value: &Option<String>) -> bool {
            match filter {
                None => true,
                Some(wanted) => value
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&wanted.to_lowercase())),
            }
        }

        field_matches(&self.crop, &classification.crop)
            && field_matches(&self.region, &classification.region)
            && field_matches(&self.season, &classification.season)
            && field_matches(&self.category, &classification.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_draft_rejects_blank_text() {
        assert_eq!(
            QuestionDraft::new("   ").validate(),
            Err(DraftError::MissingField("text"))
        );
        assert!(QuestionDraft::new("Best time to sow wheat?").validate().is_ok());
    }

    #[test]
    fn revised_verdict_requires_comments_and_text() {
        let missing_text = PeerVerdictDraft {
            verdict: PeerVerdict::Revised,
            comments: Some("cite a source".into()),
            revised_answer_text: None,
        };
        assert_eq!(
            missing_text.validate(),
            Err(DraftError::MissingField("revised_answer_text"))
        );
        assert!(PeerVerdictDraft::revise("cite a source", "better text").validate().is_ok());
        assert!(PeerVerdictDraft::approve().validate().is_ok());
    }

    #[test]
    fn invalid_moderation_requires_comments() {
        assert!(ModerationDraft::invalid("unsupported claim").validate().is_ok());
        let bare = ModerationDraft {
            verdict: ModeratorVerdict::Invalid,
            comments: None,
        };
        assert_eq!(bare.validate(), Err(DraftError::MissingField("comments")));
        assert!(ModerationDraft::valid().validate().is_ok());
    }

    #[test]
    fn faq_filter_substring_match() {
        let classification = Classification {
            crop: Some("Winter Wheat".into()),
            region: Some("Punjab".into()),
            season: None,
            category: None,
        };
        let filter = FaqFilter {
            crop: Some("wheat".into()),
            ..FaqFilter::any()
        };
        assert!(filter.matches(&classification));

        let season_filter = FaqFilter {
            season: Some("rabi".into()),
            ..FaqFilter::any()
        };
        assert!(!season_filter.matches(&classification));
    }
}
