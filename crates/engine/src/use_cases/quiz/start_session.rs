//! Start session use case.
//!
//! Validates and normalizes the request, checks the player exists, generates
//! the questions round-robin over the requested quiz types and starts the
//! session.

use std::sync::Arc;

use naturieux_domain::{
    Difficulty, IconicTaxon, PlayerId, Question, QuizSession, QuizType, SessionConfig, SessionId,
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{ClockPort, PlayerRepo, QuizSessionRepo};

use super::assembler::QuestionAssembler;
use super::error::QuizError;

/// Raw start-session input, as received from a transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub user_id: String,
    /// Unrecognized or missing values fall back to beginner
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Empty means `["image"]`
    #[serde(default)]
    pub quiz_types: Vec<String>,
    #[serde(default)]
    pub taxon_filter: Option<String>,
    /// Zero or negative means the configured default. Values above the
    /// configured maximum are clamped to it.
    #[serde(default)]
    pub question_count: i32,
}

/// What the player needs to begin answering.
#[derive(Debug, Clone)]
pub struct StartSessionResponse {
    pub session_id: SessionId,
    pub first_question: Option<Question>,
    pub total_questions: usize,
}

impl From<&QuizSession> for StartSessionResponse {
    fn from(session: &QuizSession) -> Self {
        Self {
            session_id: session.id(),
            first_question: session.current_question().cloned(),
            total_questions: session.questions_count(),
        }
    }
}

/// Request after defaults and validation.
#[derive(Debug, Clone, PartialEq)]
struct NormalizedRequest {
    user_id: PlayerId,
    difficulty: Difficulty,
    quiz_types: Vec<QuizType>,
    taxon_filter: Option<IconicTaxon>,
    question_count: usize,
}

/// Start session use case.
///
/// Orchestrates: request normalization, player check, question generation,
/// session construction and start, optional persistence.
pub struct StartSession {
    assembler: Arc<QuestionAssembler>,
    players: Arc<dyn PlayerRepo>,
    sessions: Option<Arc<dyn QuizSessionRepo>>,
    clock: Arc<dyn ClockPort>,
    default_question_count: u32,
    max_question_count: u32,
}

impl StartSession {
    pub fn new(
        assembler: Arc<QuestionAssembler>,
        players: Arc<dyn PlayerRepo>,
        sessions: Option<Arc<dyn QuizSessionRepo>>,
        clock: Arc<dyn ClockPort>,
        default_question_count: u32,
        max_question_count: u32,
    ) -> Self {
        Self {
            assembler,
            players,
            sessions,
            clock,
            default_question_count,
            max_question_count: max_question_count.max(1),
        }
    }

    /// Create and start a session. The returned session is `in_progress`.
    pub async fn execute(&self, request: StartSessionRequest) -> Result<QuizSession, QuizError> {
        let request = self.normalize(request)?;

        if self.players.get(&request.user_id).await?.is_none() {
            return Err(QuizError::not_found("Player", &request.user_id));
        }

        let questions = self.generate_questions(&request).await?;

        let mut session = QuizSession::new(SessionConfig {
            user_id: request.user_id.clone(),
            difficulty: request.difficulty,
            quiz_types: request.quiz_types,
            taxon_filter: request.taxon_filter,
            questions,
        })?;
        session.start(self.clock.now())?;

        if let Some(sessions) = &self.sessions {
            sessions.save(&session).await?;
        }

        tracing::info!(
            session_id = %session.id(),
            user_id = %session.user_id(),
            difficulty = %session.difficulty(),
            questions = session.questions_count(),
            "Quiz session started"
        );

        Ok(session)
    }

    fn normalize(&self, request: StartSessionRequest) -> Result<NormalizedRequest, QuizError> {
        let user_id = PlayerId::new(request.user_id)
            .map_err(|_| QuizError::validation("User id is required"))?;

        let difficulty = match request.difficulty.as_deref() {
            None => Difficulty::Beginner,
            Some(raw) => raw.parse::<Difficulty>().unwrap_or_else(|_| {
                tracing::debug!(difficulty = %raw, "Unrecognized difficulty, using beginner");
                Difficulty::Beginner
            }),
        };

        let mut quiz_types = request
            .quiz_types
            .iter()
            .map(|raw| raw.parse::<QuizType>())
            .collect::<Result<Vec<_>, _>>()?;
        if quiz_types.is_empty() {
            quiz_types.push(QuizType::Image);
        }

        let taxon_filter = request
            .taxon_filter
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(str::parse::<IconicTaxon>)
            .transpose()?;

        let requested = u32::try_from(request.question_count)
            .ok()
            .filter(|count| *count > 0)
            .unwrap_or(self.default_question_count);
        if requested > self.max_question_count {
            tracing::debug!(
                requested,
                max = self.max_question_count,
                "Question count above maximum, clamping"
            );
        }
        let question_count = requested.clamp(1, self.max_question_count) as usize;

        Ok(NormalizedRequest {
            user_id,
            difficulty,
            quiz_types,
            taxon_filter,
            question_count,
        })
    }

    /// Round-robin over quiz types. Individual failures are skipped; only a
    /// run that produces nothing fails.
    async fn generate_questions(&self, request: &NormalizedRequest) -> Result<Vec<Question>, QuizError> {
        let taxon = request.taxon_filter.or(self.assembler.taxon_filter());
        let mut questions = Vec::with_capacity(request.question_count);

        for slot in 0..request.question_count {
            let quiz_type = request.quiz_types[slot % request.quiz_types.len()];
            match self
                .assembler
                .create_question_for_taxon(quiz_type, request.difficulty, taxon)
                .await
            {
                Ok(question) => questions.push(question),
                Err(e) => {
                    tracing::warn!(
                        user_id = %request.user_id,
                        quiz_type = %quiz_type,
                        slot,
                        error = %e,
                        "Question generation failed, skipping slot"
                    );
                }
            }
        }

        if questions.is_empty() {
            return Err(QuizError::InsufficientData(
                "Failed to generate any questions".to_string(),
            ));
        }
        Ok(questions)
    }
}
