use crate::infrastructure::ports::RepoError;
use naturieux_domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Player already exists: {0}")]
    AlreadyExists(String),
    #[error("Player not found: {0}")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
