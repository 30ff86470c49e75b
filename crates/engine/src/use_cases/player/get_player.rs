//! Player profile lookup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use naturieux_domain::{Achievement, Player, PlayerId};
use serde::Serialize;

use crate::infrastructure::ports::PlayerRepo;

use super::error::PlayerError;

/// Read model of a player's progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub player_id: String,
    pub username: String,
    pub level: u32,
    pub total_xp: u64,
    pub xp_to_next_level: u64,
    /// Percentage of the current level completed, 0-100
    pub xp_progress: f64,
    pub games_played: u32,
    pub questions_answered: u32,
    pub accuracy: f64,
    pub best_streak: u32,
    pub daily_streak: u32,
    pub achievements: Vec<Achievement>,
    pub last_played_at: Option<DateTime<Utc>>,
}

impl From<&Player> for PlayerProfile {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.id().to_string(),
            username: player.username().to_string(),
            level: player.level(),
            total_xp: player.total_xp(),
            xp_to_next_level: player.xp_to_next_level(),
            xp_progress: player.xp_progress(),
            games_played: player.games_played(),
            questions_answered: player.questions_answered(),
            accuracy: player.accuracy(),
            best_streak: player.best_streak(),
            daily_streak: player.daily_streak(),
            achievements: player.achievements().to_vec(),
            last_played_at: player.last_played_at(),
        }
    }
}

pub struct GetPlayer {
    players: Arc<dyn PlayerRepo>,
}

impl GetPlayer {
    pub fn new(players: Arc<dyn PlayerRepo>) -> Self {
        Self { players }
    }

    pub async fn execute(&self, player_id: &str) -> Result<PlayerProfile, PlayerError> {
        let id = PlayerId::new(player_id)?;
        let player = self
            .players
            .get(&id)
            .await?
            .ok_or_else(|| PlayerError::NotFound(id.to_string()))?;
        Ok(PlayerProfile::from(&player))
    }
}
