//! XP leaderboard.

use std::sync::Arc;

use naturieux_domain::Player;
use serde::Serialize;

use crate::infrastructure::ports::PlayerRepo;

use super::error::PlayerError;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
pub const MAX_LEADERBOARD_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based
    pub rank: usize,
    pub player_id: String,
    pub username: String,
    pub level: u32,
    pub total_xp: u64,
    pub accuracy: f64,
}

impl LeaderboardEntry {
    fn ranked(rank: usize, player: &Player) -> Self {
        Self {
            rank,
            player_id: player.id().to_string(),
            username: player.username().to_string(),
            level: player.level(),
            total_xp: player.total_xp(),
            accuracy: player.accuracy(),
        }
    }
}

pub struct Leaderboard {
    players: Arc<dyn PlayerRepo>,
}

impl Leaderboard {
    pub fn new(players: Arc<dyn PlayerRepo>) -> Self {
        Self { players }
    }

    /// Top players by total XP. A zero limit means the default size; larger
    /// requests are capped.
    pub async fn execute(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, PlayerError> {
        let limit = match limit {
            0 => DEFAULT_LEADERBOARD_SIZE,
            n => n.min(MAX_LEADERBOARD_SIZE),
        };

        let players = self.players.leaderboard(limit).await?;
        Ok(players
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, player)| LeaderboardEntry::ranked(i + 1, player))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockPlayerRepo;
    use chrono::{TimeZone, Utc};
    use naturieux_domain::{PlayerId, Username};

    fn player(id: &str, xp: i64) -> Player {
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 3, 3, 3).unwrap();
        let mut p = Player::new(
            PlayerId::new(id).unwrap(),
            Username::new(format!("user-{id}")).unwrap(),
            now,
        );
        p.add_xp(xp, now);
        p
    }

    #[tokio::test]
    async fn ranks_in_store_order() {
        let mut players = MockPlayerRepo::new();
        players
            .expect_leaderboard()
            .withf(|limit| *limit == 3)
            .returning(|_| Ok(vec![player("a", 900), player("b", 400), player("c", 10)]));

        let entries = Leaderboard::new(Arc::new(players)).execute(3).await.unwrap();
        let ranks: Vec<_> = entries.iter().map(|e| (e.rank, e.player_id.as_str())).collect();
        assert_eq!(ranks, vec![(1, "a"), (2, "b"), (3, "c")]);
        assert_eq!(entries[0].total_xp, 900);
        assert_eq!(entries[0].username, "user-a");
    }

    #[tokio::test]
    async fn zero_limit_uses_default() {
        let mut players = MockPlayerRepo::new();
        players
            .expect_leaderboard()
            .withf(|limit| *limit == DEFAULT_LEADERBOARD_SIZE)
            .returning(|_| Ok(Vec::new()));

        let entries = Leaderboard::new(Arc::new(players)).execute(0).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn oversized_limit_is_capped() {
        let mut players = MockPlayerRepo::new();
        players
            .expect_leaderboard()
            .withf(|limit| *limit == MAX_LEADERBOARD_SIZE)
            .returning(|_| Ok(Vec::new()));

        Leaderboard::new(Arc::new(players)).execute(5_000).await.unwrap();
    }
}
