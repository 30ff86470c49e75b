//! Naturieux domain
//!
//! Pure gameplay model of the species-identification quiz: species and
//! questions, the scoring rule, the quiz session state machine and player
//! progression.
//!
//! The crate performs no I/O and owns no clock or random source. Time is
//! passed in as [`chrono::DateTime<Utc>`](chrono::DateTime) arguments and
//! anything random (species sampling, choice shuffling) is done by the
//! engine before values reach these types.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    xp_for_level, xp_required_to_reach, Answer, Player, QuizSession, SessionConfig, SessionStatus,
    MAX_LEVEL,
};
pub use entities::{Choice, Photo, Question, Species, MIN_CHOICES};
pub use error::DomainError;
pub use events::{AchievementUnlocked, GameEvent, LevelUpEvent, SessionCompleted};
pub use ids::{PlayerId, QuestionId, SessionId, SpeciesId};
pub use value_objects::{
    Achievement, AchievementInfo, Difficulty, DifficultyConfig, IconicTaxon, QuizType,
    ScientificName, Username,
};
