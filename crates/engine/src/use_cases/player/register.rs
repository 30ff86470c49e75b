//! Register player use case.

use std::sync::Arc;

use naturieux_domain::{Player, PlayerId, Username};
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{ClockPort, PlayerRepo};

use super::error::PlayerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPlayerRequest {
    pub player_id: String,
    pub username: String,
}

pub struct RegisterPlayer {
    players: Arc<dyn PlayerRepo>,
    clock: Arc<dyn ClockPort>,
}

impl RegisterPlayer {
    pub fn new(players: Arc<dyn PlayerRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { players, clock }
    }

    /// Create a level-1 player. Both the id and the username must be unused.
    pub async fn execute(&self, request: RegisterPlayerRequest) -> Result<Player, PlayerError> {
        let id = PlayerId::new(request.player_id)?;
        let username = Username::new(request.username)?;

        if self.players.get(&id).await?.is_some() {
            return Err(PlayerError::AlreadyExists(id.to_string()));
        }
        if self.players.get_by_username(&username).await?.is_some() {
            return Err(PlayerError::AlreadyExists(username.to_string()));
        }

        let player = Player::new(id, username, self.clock.now());
        self.players.create(&player).await?;

        tracing::info!(
            player_id = %player.id(),
            username = %player.username(),
            "Player registered"
        );
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockPlayerRepo, RepoError};
    use chrono::{TimeZone, Utc};

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()))
    }

    fn request(id: &str, username: &str) -> RegisterPlayerRequest {
        RegisterPlayerRequest {
            player_id: id.to_string(),
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn creates_fresh_player() {
        let mut players = MockPlayerRepo::new();
        players.expect_get().returning(|_| Ok(None));
        players.expect_get_by_username().returning(|_| Ok(None));
        players
            .expect_create()
            .withf(|p| p.id().as_str() == "p1" && p.level() == 1 && p.total_xp() == 0)
            .times(1)
            .returning(|_| Ok(()));

        let uc = RegisterPlayer::new(Arc::new(players), clock());
        let player = uc.execute(request("p1", "ada")).await.unwrap();
        assert_eq!(player.username().as_str(), "ada");
        assert_eq!(player.created_at(), clock().0);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let mut players = MockPlayerRepo::new();
        players.expect_get().returning(|id| {
            Ok(Some(Player::new(
                id.clone(),
                Username::new("someone").unwrap(),
                Utc::now(),
            )))
        });
        players.expect_create().never();

        let uc = RegisterPlayer::new(Arc::new(players), clock());
        let result = uc.execute(request("p1", "ada")).await;
        assert!(matches!(result, Err(PlayerError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let mut players = MockPlayerRepo::new();
        players.expect_get().returning(|_| Ok(None));
        players.expect_get_by_username().returning(|name| {
            Ok(Some(Player::new(
                PlayerId::new("other").unwrap(),
                name.clone(),
                Utc::now(),
            )))
        });
        players.expect_create().never();

        let uc = RegisterPlayer::new(Arc::new(players), clock());
        let result = uc.execute(request("p1", "ada")).await;
        assert!(matches!(result, Err(PlayerError::AlreadyExists(name)) if name == "ada"));
    }

    #[tokio::test]
    async fn blank_fields_are_validation_errors() {
        let uc = RegisterPlayer::new(Arc::new(MockPlayerRepo::new()), clock());
        assert!(matches!(
            uc.execute(request("", "ada")).await,
            Err(PlayerError::Validation(_))
        ));
        assert!(matches!(
            uc.execute(request("p1", "  ")).await,
            Err(PlayerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn store_conflict_surfaces_as_repo_error() {
        let mut players = MockPlayerRepo::new();
        players.expect_get().returning(|_| Ok(None));
        players.expect_get_by_username().returning(|_| Ok(None));
        players
            .expect_create()
            .returning(|_| Err(RepoError::constraint("player p1 already exists")));

        let uc = RegisterPlayer::new(Arc::new(players), clock());
        let result = uc.execute(request("p1", "ada")).await;
        assert!(matches!(result, Err(PlayerError::Repo(_))));
    }
}
