//! Quiz operation errors.

use crate::infrastructure::ports::{CatalogError, RepoError};
use naturieux_domain::DomainError;

/// Errors that can occur during quiz operations.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Missing or malformed input, or a value rejected by a domain rule.
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    /// Not enough candidate species to build a question or a session.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    /// Operation attempted outside its legal session lifecycle state.
    #[error("Invalid session state: {0}")]
    State(String),
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: CatalogError,
    },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl QuizError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn upstream(context: &'static str, source: CatalogError) -> Self {
        Self::Upstream { context, source }
    }
}

impl From<DomainError> for QuizError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidStateTransition(msg) => Self::State(msg),
            DomainError::InsufficientData(msg) => Self::InsufficientData(msg),
            DomainError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_onto_quiz_taxonomy() {
        assert!(matches!(
            QuizError::from(DomainError::invalid_state_transition("done")),
            QuizError::State(_)
        ));
        assert!(matches!(
            QuizError::from(DomainError::insufficient_data("few")),
            QuizError::InsufficientData(_)
        ));
        assert!(matches!(
            QuizError::from(DomainError::not_found("Player", "p1")),
            QuizError::NotFound { entity_type: "Player", .. }
        ));
        assert!(matches!(
            QuizError::from(DomainError::parse("bad")),
            QuizError::Validation(_)
        ));
    }

    #[test]
    fn upstream_keeps_context_and_source() {
        let err = QuizError::upstream("fetching correct species", CatalogError::RateLimited);
        assert_eq!(
            err.to_string(),
            "fetching correct species: Catalog rate limit exceeded"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
