use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How the correct species is presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    /// Full photo visible for the whole question
    Image,
    /// Photo shown briefly, then hidden
    Flash,
    /// Only part of the photo is revealed
    Partial,
    /// Outline of the subject only
    Silhouette,
    /// Audio recording instead of a photo
    Sound,
}

impl QuizType {
    pub const ALL: [QuizType; 5] = [
        Self::Image,
        Self::Flash,
        Self::Partial,
        Self::Silhouette,
        Self::Sound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Flash => "flash",
            Self::Partial => "partial",
            Self::Silhouette => "silhouette",
            Self::Sound => "sound",
        }
    }
}

impl std::fmt::Display for QuizType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuizType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "flash" => Ok(Self::Flash),
            "partial" => Ok(Self::Partial),
            "silhouette" => Ok(Self::Silhouette),
            "sound" => Ok(Self::Sound),
            _ => Err(DomainError::parse(format!("Unknown quiz type: {}", s))),
        }
    }
}
