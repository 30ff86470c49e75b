use std::collections::HashMap;

use async_trait::async_trait;
use naturieux_domain::{Player, PlayerId, Username};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{PlayerRepo, RepoError};

#[derive(Default)]
pub struct InMemoryPlayerRepo {
    players: RwLock<HashMap<PlayerId, Player>>,
}

impl InMemoryPlayerRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayerRepo for InMemoryPlayerRepo {
    async fn create(&self, player: &Player) -> Result<(), RepoError> {
        let mut players = self.players.write().await;
        if players.contains_key(player.id()) {
            return Err(RepoError::constraint(format!(
                "player {} already exists",
                player.id()
            )));
        }
        if players.values().any(|p| p.username() == player.username()) {
            return Err(RepoError::constraint(format!(
                "username {} is taken",
                player.username()
            )));
        }
        players.insert(player.id().clone(), player.clone());
        Ok(())
    }

    async fn get(&self, id: &PlayerId) -> Result<Option<Player>, RepoError> {
        Ok(self.players.read().await.get(id).cloned())
    }

    async fn get_by_username(&self, username: &Username) -> Result<Option<Player>, RepoError> {
        Ok(self
            .players
            .read()
            .await
            .values()
            .find(|p| p.username() == username)
            .cloned())
    }

    async fn update(&self, player: &Player) -> Result<(), RepoError> {
        let mut players = self.players.write().await;
        match players.get_mut(player.id()) {
            Some(stored) => {
                *stored = player.clone();
                Ok(())
            }
            None => Err(RepoError::not_found("Player", player.id())),
        }
    }

    async fn leaderboard(&self, limit: usize) -> Result<Vec<Player>, RepoError> {
        let mut ranked: Vec<Player> = self.players.read().await.values().cloned().collect();
        ranked.sort_by(|a, b| {
            b.total_xp()
                .cmp(&a.total_xp())
                .then_with(|| a.id().cmp(b.id()))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }
}
