//! Quiz use cases.
//!
//! Question assembly, the session lifecycle and post-session progression.

use std::sync::Arc;

mod abandon_session;
mod active_sessions;
mod assembler;
mod error;
mod progression;
mod start_session;
mod stats;
mod submit_answer;

pub use abandon_session::AbandonSession;
pub use active_sessions::{ActiveSessions, SessionHandle};
pub use assembler::QuestionAssembler;
pub use error::QuizError;
pub use progression::{session_xp, ProgressionSummary, SessionProgression};
pub use start_session::{StartSession, StartSessionRequest, StartSessionResponse};
pub use stats::GetSessionStats;
pub use submit_answer::{SubmitAnswer, SubmitAnswerRequest, SubmitAnswerResponse};

/// Container for quiz use cases.
pub struct QuizUseCases {
    pub start: Arc<StartSession>,
    pub submit: Arc<SubmitAnswer>,
    pub abandon: Arc<AbandonSession>,
    pub stats: Arc<GetSessionStats>,
}

impl QuizUseCases {
    pub fn new(
        start: Arc<StartSession>,
        submit: Arc<SubmitAnswer>,
        abandon: Arc<AbandonSession>,
        stats: Arc<GetSessionStats>,
    ) -> Self {
        Self {
            start,
            submit,
            abandon,
            stats,
        }
    }
}
