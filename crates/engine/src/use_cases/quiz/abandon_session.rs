//! Abandon session use case.

use std::sync::Arc;

use naturieux_domain::QuizSession;

use crate::infrastructure::ports::{ClockPort, QuizSessionRepo};

use super::error::QuizError;

pub struct AbandonSession {
    sessions: Option<Arc<dyn QuizSessionRepo>>,
    clock: Arc<dyn ClockPort>,
}

impl AbandonSession {
    pub fn new(sessions: Option<Arc<dyn QuizSessionRepo>>, clock: Arc<dyn ClockPort>) -> Self {
        Self { sessions, clock }
    }

    /// Move a non-terminal session to `abandoned` and persist it.
    pub async fn execute(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        session.abandon(self.clock.now())?;

        if let Some(sessions) = &self.sessions {
            sessions.save(session).await?;
        }

        tracing::info!(
            session_id = %session.id(),
            user_id = %session.user_id(),
            answered = session.answered_count(),
            "Quiz session abandoned"
        );
        Ok(())
    }
}
