//! Submit answer use case.

use std::sync::Arc;

use chrono::Duration;
use naturieux_domain::{Question, QuizSession, SessionStatus, SpeciesId};
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{ClockPort, QuizSessionRepo};

use super::error::QuizError;
use super::progression::{ProgressionSummary, SessionProgression};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub species_id: u32,
    /// Time the player took, in milliseconds
    pub time_taken_ms: i64,
}

/// Outcome of one answer plus the session aggregates after it.
#[derive(Debug, Clone)]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub score: u32,
    pub correct_species_id: SpeciesId,
    pub correct_name: String,
    pub current_streak: u32,
    pub total_score: u32,
    pub accuracy: f64,
    pub session_complete: bool,
    pub next_question: Option<Question>,
    /// Present when the session completed and progression succeeded
    pub progression: Option<ProgressionSummary>,
}

pub struct SubmitAnswer {
    sessions: Option<Arc<dyn QuizSessionRepo>>,
    progression: Arc<SessionProgression>,
    clock: Arc<dyn ClockPort>,
}

impl SubmitAnswer {
    pub fn new(
        sessions: Option<Arc<dyn QuizSessionRepo>>,
        progression: Arc<SessionProgression>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            sessions,
            progression,
            clock,
        }
    }

    /// Record an answer on `session`.
    ///
    /// The caller must hold the session exclusively for the whole call.
    pub async fn execute(
        &self,
        session: &mut QuizSession,
        request: SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, QuizError> {
        let species_id = SpeciesId::new(request.species_id)?;
        if request.time_taken_ms < 0 {
            return Err(QuizError::validation("Time taken cannot be negative"));
        }
        let time_taken = Duration::milliseconds(request.time_taken_ms);

        let (correct_species_id, correct_name) = {
            let question = session
                .current_question()
                .ok_or_else(|| QuizError::State("No current question".to_string()))?;
            let correct = question.correct_species();
            (correct.id(), correct.display_name().to_string())
        };

        let answer = session.submit_answer(species_id, time_taken, self.clock.now())?;

        if let Some(sessions) = &self.sessions {
            if let Err(e) = sessions.save(session).await {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    "Failed to save session after answer"
                );
            }
        }

        let session_complete = session.status() == SessionStatus::Completed;
        let progression = if session_complete {
            match self.progression.apply(session).await {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::error!(
                        session_id = %session.id(),
                        user_id = %session.user_id(),
                        error = %e,
                        "Failed to apply session progression"
                    );
                    None
                }
            }
        } else {
            None
        };

        tracing::debug!(
            session_id = %session.id(),
            is_correct = answer.is_correct,
            score = answer.score,
            answered = session.answered_count(),
            "Answer recorded"
        );

        Ok(SubmitAnswerResponse {
            is_correct: answer.is_correct,
            score: answer.score,
            correct_species_id,
            correct_name,
            current_streak: session.current_streak(),
            total_score: session.total_score(),
            accuracy: session.accuracy(),
            session_complete,
            next_question: session.current_question().cloned(),
            progression,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockPlayerRepo, MockQuizSessionRepo, RepoError};
    use chrono::{DateTime, TimeZone, Utc};
    use naturieux_domain::{
        Choice, Difficulty, Player, PlayerId, QuestionId, QuizType, ScientificName, SessionConfig,
        Species, Username,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 9, 9, 0, 0).unwrap()
    }

    fn question(id: u32) -> Question {
        let correct = Species::new(
            SpeciesId::new(id).unwrap(),
            ScientificName::new("Erithacus rubecula").unwrap(),
        )
        .with_common_name("European Robin");
        let decoy = Species::new(
            SpeciesId::new(id + 100).unwrap(),
            ScientificName::new("Turdus merula").unwrap(),
        );
        Question::new(
            QuestionId::new(),
            QuizType::Image,
            Difficulty::Beginner,
            correct.clone(),
            vec![Choice::wrong(decoy), Choice::correct(correct)],
            "https://img.example/robin.jpg",
        )
        .unwrap()
    }

    fn running_session(count: u32) -> QuizSession {
        let mut session = QuizSession::new(SessionConfig {
            user_id: PlayerId::new("p1").unwrap(),
            difficulty: Difficulty::Beginner,
            quiz_types: vec![QuizType::Image],
            taxon_filter: None,
            questions: (1..=count).map(question).collect(),
        })
        .unwrap();
        session.start(now()).unwrap();
        session
    }

    fn progression(players: MockPlayerRepo) -> Arc<SessionProgression> {
        Arc::new(SessionProgression::new(
            Arc::new(players),
            None,
            Arc::new(FixedClock(now())),
        ))
    }

    fn use_case(sessions: Option<MockQuizSessionRepo>, players: MockPlayerRepo) -> SubmitAnswer {
        SubmitAnswer::new(
            sessions.map(|s| Arc::new(s) as Arc<dyn QuizSessionRepo>),
            progression(players),
            Arc::new(FixedClock(now())),
        )
    }

    fn answer(species_id: u32, ms: i64) -> SubmitAnswerRequest {
        SubmitAnswerRequest {
            species_id,
            time_taken_ms: ms,
        }
    }

    #[tokio::test]
    async fn correct_answer_mid_session() {
        let uc = use_case(None, MockPlayerRepo::new());
        let mut session = running_session(2);

        let response = uc.execute(&mut session, answer(1, 5_000)).await.unwrap();

        assert!(response.is_correct);
        assert_eq!(response.score, 141);
        assert_eq!(response.correct_species_id.get(), 1);
        assert_eq!(response.correct_name, "European Robin");
        assert_eq!(response.current_streak, 1);
        assert_eq!(response.total_score, 141);
        assert_eq!(response.accuracy, 100.0);
        assert!(!response.session_complete);
        assert!(response.next_question.is_some());
        assert!(response.progression.is_none());
    }

    #[tokio::test]
    async fn wrong_answer_reports_correct_species() {
        let uc = use_case(None, MockPlayerRepo::new());
        let mut session = running_session(2);

        let response = uc.execute(&mut session, answer(101, 5_000)).await.unwrap();
        assert!(!response.is_correct);
        assert_eq!(response.score, 0);
        assert_eq!(response.correct_species_id.get(), 1);
        assert_eq!(response.current_streak, 0);
    }

    #[tokio::test]
    async fn last_answer_completes_and_applies_progression() {
        let mut players = MockPlayerRepo::new();
        players.expect_get().returning(|id| {
            Ok(Some(Player::new(id.clone(), Username::new("ada").unwrap(), now())))
        });
        players.expect_update().times(1).returning(|_| Ok(()));

        let uc = use_case(None, players);
        let mut session = running_session(1);

        let response = uc.execute(&mut session, answer(1, 0)).await.unwrap();
        assert!(response.session_complete);
        assert!(response.next_question.is_none());
        assert_eq!(session.status(), SessionStatus::Completed);

        let summary = response.progression.unwrap();
        // 150 score + 100 accuracy bonus + 10 streak
        assert_eq!(summary.xp_awarded, 260);
    }

    #[tokio::test]
    async fn progression_failure_keeps_the_answer() {
        let mut players = MockPlayerRepo::new();
        players
            .expect_get()
            .returning(|_| Err(RepoError::database("get_player", "unreachable")));

        let uc = use_case(None, players);
        let mut session = running_session(1);

        let response = uc.execute(&mut session, answer(1, 1_000)).await.unwrap();
        assert!(response.is_correct);
        assert!(response.session_complete);
        assert!(response.progression.is_none());
        assert_eq!(session.answered_count(), 1);
    }

    #[tokio::test]
    async fn session_save_failure_is_not_fatal() {
        let mut sessions = MockQuizSessionRepo::new();
        sessions
            .expect_save()
            .times(1)
            .returning(|_| Err(RepoError::database("save_session", "io")));

        let uc = use_case(Some(sessions), MockPlayerRepo::new());
        let mut session = running_session(2);

        let response = uc.execute(&mut session, answer(1, 1_000)).await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn completed_session_rejects_answers() {
        let mut players = MockPlayerRepo::new();
        players.expect_get().returning(|_| Ok(None));

        let uc = use_case(None, players);
        let mut session = running_session(1);
        uc.execute(&mut session, answer(1, 1_000)).await.unwrap();

        let result = uc.execute(&mut session, answer(1, 1_000)).await;
        assert!(matches!(result, Err(QuizError::State(_))));
        assert_eq!(session.answered_count(), 1);
    }

    #[tokio::test]
    async fn abandoned_session_rejects_answers() {
        let uc = use_case(None, MockPlayerRepo::new());
        let mut session = running_session(2);
        session.abandon(now()).unwrap();

        let result = uc.execute(&mut session, answer(1, 1_000)).await;
        assert!(matches!(result, Err(QuizError::State(_))));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_touching_the_session() {
        let uc = use_case(None, MockPlayerRepo::new());
        let mut session = running_session(2);

        let zero_id = uc.execute(&mut session, answer(0, 1_000)).await;
        assert!(matches!(zero_id, Err(QuizError::Validation(_))));

        let negative_time = uc.execute(&mut session, answer(1, -1)).await;
        assert!(matches!(negative_time, Err(QuizError::Validation(_))));

        assert_eq!(session.answered_count(), 0);
    }
}
