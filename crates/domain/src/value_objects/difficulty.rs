//! Difficulty levels and their fixed gameplay parameters.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Quiz difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
    Master,
}

/// The fixed per-difficulty tuple of choice count, time limit, score
/// multiplier and flash display duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    pub difficulty: Difficulty,
    pub choices_count: usize,
    pub time_limit: Duration,
    pub score_multiplier: f64,
    pub flash_duration: Duration,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Expert,
        Self::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
            Self::Master => "master",
        }
    }

    /// Gameplay parameters for this difficulty.
    pub fn config(&self) -> DifficultyConfig {
        match self {
            Self::Beginner => DifficultyConfig {
                difficulty: *self,
                choices_count: 4,
                time_limit: Duration::seconds(30),
                score_multiplier: 1.0,
                flash_duration: Duration::seconds(5),
            },
            Self::Intermediate => DifficultyConfig {
                difficulty: *self,
                choices_count: 6,
                time_limit: Duration::seconds(20),
                score_multiplier: 1.5,
                flash_duration: Duration::seconds(3),
            },
            Self::Expert => DifficultyConfig {
                difficulty: *self,
                choices_count: 8,
                time_limit: Duration::seconds(15),
                score_multiplier: 2.0,
                flash_duration: Duration::seconds(2),
            },
            Self::Master => DifficultyConfig {
                difficulty: *self,
                choices_count: 10,
                time_limit: Duration::seconds(10),
                score_multiplier: 3.0,
                flash_duration: Duration::seconds(1),
            },
        }
    }

    #[inline]
    pub fn choices_count(&self) -> usize {
        self.config().choices_count
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.config().time_limit
    }

    #[inline]
    pub fn score_multiplier(&self) -> f64 {
        self.config().score_multiplier
    }

    #[inline]
    pub fn flash_duration(&self) -> Duration {
        self.config().flash_duration
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            "master" => Ok(Self::Master),
            _ => Err(DomainError::parse(format!("Unknown difficulty: {}", s))),
        }
    }
}
