//! QuizSession aggregate - a timed multi-question run for one player
//!
//! # Lifecycle
//!
//! ```text
//! pending --start--> in_progress --last answer--> completed
//!    |                    |
//!    +------abandon-------+-----------------------> abandoned
//! ```
//!
//! `completed` and `abandoned` are terminal. The session owns its questions
//! (fixed at construction) and its answers (append-only, one per question).
//!
//! The aggregate is not internally synchronized; callers hold an exclusive
//! handle for the duration of each mutation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Question;
use crate::error::DomainError;
use crate::value_objects::{Difficulty, IconicTaxon, QuizType};
use crate::{PlayerId, QuestionId, SessionId, SpeciesId};

/// A running streak at or above this length earns a per-answer bonus.
const STREAK_BONUS_THRESHOLD: u32 = 3;

/// Bonus points per streak step once the threshold is reached.
const STREAK_BONUS_PER_STEP: u32 = 10;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded answer. Appended once per question, never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub species_id: SpeciesId,
    #[serde(with = "duration_millis")]
    pub time_taken: Duration,
    pub is_correct: bool,
    /// Question score plus any streak bonus
    pub score: u32,
    pub answered_at: DateTime<Utc>,
}

/// Everything needed to construct a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub user_id: PlayerId,
    pub difficulty: Difficulty,
    pub quiz_types: Vec<QuizType>,
    pub taxon_filter: Option<IconicTaxon>,
    pub questions: Vec<Question>,
}

/// A quiz session.
///
/// # Invariants
///
/// - at least one question, fixed at construction
/// - `answers.len() == current_index` at all times
/// - `current_index` only increases
/// - status transitions are monotone; no answers after a terminal state
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: SessionId,
    user_id: PlayerId,
    difficulty: Difficulty,
    quiz_types: Vec<QuizType>,
    taxon_filter: Option<IconicTaxon>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    current_index: usize,
    total_score: u32,
    streak: u32,
    max_streak: u32,
    status: SessionStatus,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a pending session from a validated configuration.
    pub fn new(config: SessionConfig) -> Result<Self, DomainError> {
        if config.questions.is_empty() {
            return Err(DomainError::validation("At least one question is required"));
        }
        if config.quiz_types.is_empty() {
            return Err(DomainError::validation("At least one quiz type is required"));
        }

        let question_count = config.questions.len();
        Ok(Self {
            id: SessionId::new(),
            user_id: config.user_id,
            difficulty: config.difficulty,
            quiz_types: config.quiz_types,
            taxon_filter: config.taxon_filter,
            questions: config.questions,
            answers: Vec::with_capacity(question_count),
            current_index: 0,
            total_score: 0,
            streak: 0,
            max_streak: 0,
            status: SessionStatus::Pending,
            started_at: None,
            completed_at: None,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn user_id(&self) -> &PlayerId {
        &self.user_id
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    pub fn quiz_types(&self) -> &[QuizType] {
        &self.quiz_types
    }

    #[inline]
    pub fn taxon_filter(&self) -> Option<IconicTaxon> {
        self.taxon_filter
    }

    #[inline]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[inline]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[inline]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[inline]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[inline]
    pub fn current_streak(&self) -> u32 {
        self.streak
    }

    #[inline]
    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    #[inline]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[inline]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn questions_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    /// The question awaiting an answer, or `None` once all are answered.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Percentage of answered questions that were correct (0 with no answers).
    pub fn accuracy(&self) -> f64 {
        if self.answers.is_empty() {
            return 0.0;
        }
        self.correct_count() as f64 / self.answers.len() as f64 * 100.0
    }

    /// Wall-clock time from start to completion, or to `now` while running.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        match (self.started_at, self.completed_at) {
            (None, _) => Duration::zero(),
            (Some(start), Some(end)) => end - start,
            (Some(start), None) => now - start,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Move from `pending` to `in_progress`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != SessionStatus::Pending {
            return Err(DomainError::invalid_state_transition(format!(
                "Session cannot start from {}",
                self.status
            )));
        }
        self.status = SessionStatus::InProgress;
        self.started_at = Some(now);
        Ok(())
    }

    /// Record an answer for the current question.
    ///
    /// Completes the session in the same call when the last question is
    /// answered.
    pub fn submit_answer(
        &mut self,
        species_id: SpeciesId,
        time_taken: Duration,
        now: DateTime<Utc>,
    ) -> Result<Answer, DomainError> {
        if self.status != SessionStatus::InProgress {
            return Err(DomainError::invalid_state_transition(format!(
                "Cannot submit an answer while session is {}",
                self.status
            )));
        }

        let question = self
            .current_question()
            .ok_or_else(|| DomainError::invalid_state_transition("No current question"))?;

        let question_id = question.id();
        let is_correct = question.check_answer(species_id);
        let mut score = question.calculate_score(time_taken, is_correct);

        if is_correct {
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
            if self.streak >= STREAK_BONUS_THRESHOLD {
                score += self.streak * STREAK_BONUS_PER_STEP;
            }
        } else {
            self.streak = 0;
        }

        let answer = Answer {
            question_id,
            species_id,
            time_taken,
            is_correct,
            score,
            answered_at: now,
        };

        self.answers.push(answer.clone());
        self.total_score += score;
        self.current_index += 1;

        if self.current_index >= self.questions.len() {
            self.status = SessionStatus::Completed;
            self.completed_at = Some(now);
        }

        Ok(answer)
    }

    /// Abandon a non-terminal session.
    pub fn abandon(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state_transition(format!(
                "Session is already {}",
                self.status
            )));
        }
        self.status = SessionStatus::Abandoned;
        self.completed_at = Some(now);
        Ok(())
    }
}

mod duration_millis {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        i64::deserialize(deserializer).map(Duration::milliseconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Choice, Species};
    use crate::value_objects::ScientificName;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap()
    }

    fn species(id: u32) -> Species {
        Species::new(
            SpeciesId::new(id).unwrap(),
            ScientificName::new(format!("Species {}", id)).unwrap(),
        )
    }

    /// Question whose correct answer is `correct_id`; decoys are `correct_id + 1000`.
    fn question(correct_id: u32) -> Question {
        let correct = species(correct_id);
        Question::new(
            QuestionId::new(),
            QuizType::Image,
            Difficulty::Beginner,
            correct.clone(),
            vec![Choice::correct(correct), Choice::wrong(species(correct_id + 1000))],
            "https://example.org/q.jpg",
        )
        .unwrap()
    }

    fn session(count: u32) -> QuizSession {
        QuizSession::new(SessionConfig {
            user_id: PlayerId::new("p1").unwrap(),
            difficulty: Difficulty::Beginner,
            quiz_types: vec![QuizType::Image],
            taxon_filter: None,
            questions: (1..=count).map(question).collect(),
        })
        .unwrap()
    }

    fn right(id: u32) -> SpeciesId {
        SpeciesId::new(id).unwrap()
    }

    fn wrong(id: u32) -> SpeciesId {
        SpeciesId::new(id + 1000).unwrap()
    }

    mod constructor {
        use super::*;

        #[test]
        fn new_session_is_pending() {
            let s = session(3);
            assert_eq!(s.status(), SessionStatus::Pending);
            assert_eq!(s.questions_count(), 3);
            assert_eq!(s.answered_count(), 0);
            assert!(s.started_at().is_none());
            assert_eq!(s.accuracy(), 0.0);
            assert_eq!(s.duration(t0()), Duration::zero());
        }

        #[test]
        fn no_questions_rejected() {
            let result = QuizSession::new(SessionConfig {
                user_id: PlayerId::new("p1").unwrap(),
                difficulty: Difficulty::Beginner,
                quiz_types: vec![QuizType::Image],
                taxon_filter: None,
                questions: vec![],
            });
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        #[test]
        fn no_quiz_types_rejected() {
            let result = QuizSession::new(SessionConfig {
                user_id: PlayerId::new("p1").unwrap(),
                difficulty: Difficulty::Beginner,
                quiz_types: vec![],
                taxon_filter: Some(IconicTaxon::Aves),
                questions: vec![question(1)],
            });
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn start_only_from_pending() {
            let mut s = session(1);
            s.start(t0()).unwrap();
            assert_eq!(s.status(), SessionStatus::InProgress);
            assert_eq!(s.started_at(), Some(t0()));

            let again = s.start(t0());
            assert!(matches!(again, Err(DomainError::InvalidStateTransition(_))));
        }

        #[test]
        fn answering_every_question_completes_the_session() {
            let mut s = session(3);
            s.start(t0()).unwrap();

            for id in 1..=3 {
                assert_eq!(s.status(), SessionStatus::InProgress);
                s.submit_answer(right(id), Duration::seconds(5), t0() + Duration::seconds(i64::from(id) * 10))
                    .unwrap();
            }

            assert_eq!(s.status(), SessionStatus::Completed);
            assert_eq!(s.answered_count(), s.questions_count());
            assert!(s.current_question().is_none());
            assert_eq!(s.completed_at(), Some(t0() + Duration::seconds(30)));
            assert_eq!(s.duration(t0() + Duration::hours(1)), Duration::seconds(30));
        }

        #[test]
        fn submit_before_start_is_a_state_error() {
            let mut s = session(1);
            let result = s.submit_answer(right(1), Duration::seconds(1), t0());
            assert!(matches!(result, Err(DomainError::InvalidStateTransition(_))));
            assert_eq!(s.answered_count(), 0);
        }

        #[test]
        fn submit_after_completion_is_a_state_error() {
            let mut s = session(1);
            s.start(t0()).unwrap();
            s.submit_answer(right(1), Duration::seconds(1), t0()).unwrap();

            let result = s.submit_answer(right(1), Duration::seconds(1), t0());
            assert!(matches!(result, Err(DomainError::InvalidStateTransition(_))));
            assert_eq!(s.answered_count(), 1);
        }

        #[test]
        fn abandon_from_pending_or_in_progress() {
            let mut pending = session(2);
            pending.abandon(t0()).unwrap();
            assert_eq!(pending.status(), SessionStatus::Abandoned);
            assert_eq!(pending.completed_at(), Some(t0()));

            let mut running = session(2);
            running.start(t0()).unwrap();
            running.submit_answer(right(1), Duration::seconds(1), t0()).unwrap();
            running.abandon(t0() + Duration::seconds(20)).unwrap();
            assert_eq!(running.status(), SessionStatus::Abandoned);
            assert_eq!(running.duration(t0() + Duration::hours(2)), Duration::seconds(20));

            let result = running.submit_answer(right(2), Duration::seconds(1), t0());
            assert!(result.is_err());
        }

        #[test]
        fn terminal_states_cannot_be_left() {
            let mut s = session(1);
            s.start(t0()).unwrap();
            s.submit_answer(right(1), Duration::seconds(1), t0()).unwrap();

            assert!(s.abandon(t0()).is_err());
            assert!(s.start(t0()).is_err());
            assert_eq!(s.status(), SessionStatus::Completed);
        }

        #[test]
        fn running_duration_is_measured_to_now() {
            let mut s = session(2);
            s.start(t0()).unwrap();
            assert_eq!(s.duration(t0() + Duration::seconds(42)), Duration::seconds(42));
        }
    }

    mod scoring_and_streaks {
        use super::*;

        #[test]
        fn three_correct_then_wrong_resets_streak_but_keeps_max() {
            let mut s = session(4);
            s.start(t0()).unwrap();
            for id in 1..=3 {
                s.submit_answer(right(id), Duration::seconds(5), t0()).unwrap();
            }
            s.submit_answer(wrong(4), Duration::seconds(5), t0()).unwrap();

            assert_eq!(s.current_streak(), 0);
            assert_eq!(s.max_streak(), 3);
            assert_eq!(s.correct_count(), 3);
            assert_eq!(s.accuracy(), 75.0);
        }

        #[test]
        fn streak_bonus_applies_from_third_correct_answer() {
            let mut s = session(4);
            s.start(t0()).unwrap();

            let first = s.submit_answer(right(1), Duration::seconds(5), t0()).unwrap();
            let second = s.submit_answer(right(2), Duration::seconds(5), t0()).unwrap();
            let third = s.submit_answer(right(3), Duration::seconds(5), t0()).unwrap();
            let fourth = s.submit_answer(right(4), Duration::seconds(5), t0()).unwrap();

            assert_eq!(first.score, 141);
            assert_eq!(second.score, 141);
            assert_eq!(third.score, 141 + 30);
            assert_eq!(fourth.score, 141 + 40);
            assert_eq!(s.total_score(), 141 * 4 + 70);
        }

        #[test]
        fn wrong_answer_scores_zero_and_is_recorded() {
            let mut s = session(2);
            s.start(t0()).unwrap();
            let answer = s.submit_answer(wrong(1), Duration::seconds(2), t0()).unwrap();

            assert!(!answer.is_correct);
            assert_eq!(answer.score, 0);
            assert_eq!(s.answers().len(), 1);
            assert_eq!(s.answers()[0].question_id, s.questions()[0].id());
            assert_eq!(s.total_score(), 0);
        }

        #[test]
        fn answers_track_current_index() {
            let mut s = session(3);
            s.start(t0()).unwrap();
            for id in 1..=3 {
                let expected = s.current_question().map(|q| q.id());
                let answer = s.submit_answer(right(id), Duration::seconds(1), t0()).unwrap();
                assert_eq!(Some(answer.question_id), expected);
                assert_eq!(s.answered_count(), id as usize);
            }
        }
    }

    #[test]
    fn answer_serializes_time_taken_as_millis() {
        let answer = Answer {
            question_id: QuestionId::new(),
            species_id: right(5),
            time_taken: Duration::milliseconds(2500),
            is_correct: true,
            score: 120,
            answered_at: t0(),
        };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["time_taken"], 2500);

        let back: Answer = serde_json::from_value(json).unwrap();
        assert_eq!(back, answer);
    }
}
