//! Session statistics use case.

use std::sync::Arc;

use naturieux_domain::PlayerId;

use crate::infrastructure::ports::{QuizSessionRepo, UserQuizStats};

use super::error::QuizError;

pub struct GetSessionStats {
    sessions: Option<Arc<dyn QuizSessionRepo>>,
}

impl GetSessionStats {
    pub fn new(sessions: Option<Arc<dyn QuizSessionRepo>>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self, user_id: &str) -> Result<UserQuizStats, QuizError> {
        let sessions = self
            .sessions
            .as_ref()
            .ok_or(QuizError::NotConfigured("Session store"))?;
        let user_id =
            PlayerId::new(user_id).map_err(|_| QuizError::validation("User id is required"))?;

        Ok(sessions.stats(&user_id).await?)
    }
}
