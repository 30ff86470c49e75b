//! Domain Events
//!
//! Coarse-grained events produced when a session finishes and the player's
//! progression moves. Aggregates return them from mutations; the engine
//! forwards them to whatever event sink is configured.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Achievement, Difficulty};
use crate::{PlayerId, SessionId};

/// A player advanced one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpEvent {
    pub player_id: PlayerId,
    pub new_level: u32,
    /// Cumulative XP at the moment of the level-up
    pub total_xp: u64,
    pub occurred_at: DateTime<Utc>,
}

/// A player unlocked an achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementUnlocked {
    pub player_id: PlayerId,
    pub achievement: Achievement,
    pub xp_reward: u32,
    pub occurred_at: DateTime<Utc>,
}

/// A session reached `completed` and its progression was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCompleted {
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub difficulty: Difficulty,
    pub total_score: u32,
    pub correct_count: u32,
    pub questions_count: u32,
    pub accuracy: f64,
    pub max_streak: u32,
    pub xp_awarded: u64,
    pub player_level: u32,
    pub player_total_xp: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Domain event for significant gameplay state changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum GameEvent {
    SessionCompleted(SessionCompleted),
    LevelUp(LevelUpEvent),
    AchievementUnlocked(AchievementUnlocked),
}

impl GameEvent {
    pub fn player_id(&self) -> &PlayerId {
        match self {
            Self::SessionCompleted(e) => &e.player_id,
            Self::LevelUp(e) => &e.player_id,
            Self::AchievementUnlocked(e) => &e.player_id,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::SessionCompleted(e) => e.occurred_at,
            Self::LevelUp(e) => e.occurred_at,
            Self::AchievementUnlocked(e) => e.occurred_at,
        }
    }
}
