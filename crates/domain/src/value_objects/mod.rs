//! Value objects - Immutable objects defined by their attributes

mod achievement;
mod difficulty;
mod iconic_taxon;
mod names;
mod quiz_type;

pub use achievement::{Achievement, AchievementInfo};
pub use difficulty::{Difficulty, DifficultyConfig};
pub use iconic_taxon::IconicTaxon;
pub use names::{ScientificName, Username};
pub use quiz_type::QuizType;
