//! Question - one playable question and the rule that scores it.

use chrono::Duration;

use crate::entities::Species;
use crate::error::DomainError;
use crate::value_objects::{Difficulty, QuizType};
use crate::{QuestionId, SpeciesId};

/// Points awarded for any correct answer before time bonus and multiplier.
const BASE_SCORE: u32 = 100;

/// Share of the base score available as time bonus.
const TIME_BONUS_FACTOR: f64 = 0.5;

/// Minimum number of choices for a question to be meaningful.
pub const MIN_CHOICES: usize = 2;

/// One candidate answer shown to the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub species: Species,
    pub is_correct: bool,
}

impl Choice {
    pub fn correct(species: Species) -> Self {
        Self {
            species,
            is_correct: true,
        }
    }

    pub fn wrong(species: Species) -> Self {
        Self {
            species,
            is_correct: false,
        }
    }
}

/// A single quiz question.
///
/// # Invariants
///
/// - `id` is not the nil UUID
/// - there are at least two choices
/// - exactly one choice is flagged correct, and it is the correct species
/// - `media_url` is non-empty
///
/// Questions are immutable once built; the session that holds one owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    quiz_type: QuizType,
    difficulty: Difficulty,
    correct_species: Species,
    choices: Vec<Choice>,
    media_url: String,
    time_limit: Duration,
    flash_duration: Option<Duration>,
}

impl Question {
    /// Build a question, enforcing every invariant listed on the type.
    pub fn new(
        id: QuestionId,
        quiz_type: QuizType,
        difficulty: Difficulty,
        correct_species: Species,
        choices: Vec<Choice>,
        media_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if id.as_uuid().is_nil() {
            return Err(DomainError::validation("Question id is required"));
        }
        if choices.len() < MIN_CHOICES {
            return Err(DomainError::validation(format!(
                "At least {} choices are required, got {}",
                MIN_CHOICES,
                choices.len()
            )));
        }

        let mut correct_flags = choices.iter().filter(|c| c.is_correct);
        let flagged = correct_flags.next();
        if correct_flags.next().is_some() {
            return Err(DomainError::validation(
                "Exactly one choice must be flagged correct",
            ));
        }
        match flagged {
            None => {
                return Err(DomainError::validation(
                    "Choices must contain the correct answer",
                ))
            }
            Some(choice) if choice.species.id() != correct_species.id() => {
                return Err(DomainError::validation(
                    "Correct choice does not match the correct species",
                ))
            }
            Some(_) => {}
        }

        let media_url = media_url.into();
        if media_url.trim().is_empty() {
            return Err(DomainError::validation("Media URL is required"));
        }

        let config = difficulty.config();
        Ok(Self {
            id,
            quiz_type,
            difficulty,
            correct_species,
            choices,
            media_url,
            time_limit: config.time_limit,
            flash_duration: (quiz_type == QuizType::Flash).then_some(config.flash_duration),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[inline]
    pub fn quiz_type(&self) -> QuizType {
        self.quiz_type
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    pub fn correct_species(&self) -> &Species {
        &self.correct_species
    }

    #[inline]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[inline]
    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// How long the media stays visible. Only flash questions have one.
    #[inline]
    pub fn flash_duration(&self) -> Option<Duration> {
        self.flash_duration
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    /// True iff `species_id` is exactly the correct species.
    pub fn check_answer(&self, species_id: SpeciesId) -> bool {
        self.correct_species.id() == species_id
    }

    /// Score for an answer given after `time_taken`.
    ///
    /// Wrong answers score 0. Correct answers earn the base score plus up to
    /// half of it again as a time bonus that shrinks linearly to 0 at the time
    /// limit, all scaled by the difficulty multiplier.
    pub fn calculate_score(&self, time_taken: Duration, is_correct: bool) -> u32 {
        if !is_correct {
            return 0;
        }

        let limit_ms = self.time_limit.num_milliseconds() as f64;
        let remaining_ms = (self.time_limit - time_taken).num_milliseconds() as f64;
        let time_ratio = (remaining_ms / limit_ms).max(0.0);
        let time_bonus = (f64::from(BASE_SCORE) * time_ratio * TIME_BONUS_FACTOR).floor() as u32;

        let raw = BASE_SCORE + time_bonus;
        (f64::from(raw) * self.difficulty.score_multiplier()).floor() as u32
    }
}
