//! Repository port traits for player and session storage.

use async_trait::async_trait;
use naturieux_domain::{IconicTaxon, Player, PlayerId, QuizSession, SessionId, Username};
use serde::{Deserialize, Serialize};

use super::error::RepoError;

// =============================================================================
// Player Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    /// Insert a new player. Fails with a constraint violation when the id or
    /// the username is already taken.
    async fn create(&self, player: &Player) -> Result<(), RepoError>;
    async fn get(&self, id: &PlayerId) -> Result<Option<Player>, RepoError>;
    async fn get_by_username(&self, username: &Username) -> Result<Option<Player>, RepoError>;
    /// Overwrite an existing player (last writer wins).
    async fn update(&self, player: &Player) -> Result<(), RepoError>;
    /// Top players by total XP, highest first.
    async fn leaderboard(&self, limit: usize) -> Result<Vec<Player>, RepoError>;
}

// =============================================================================
// Session Storage
// =============================================================================

/// Aggregated quiz statistics for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuizStats {
    pub total_sessions: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    pub total_score: u64,
    pub average_accuracy: f64,
    pub best_streak: u32,
    /// Most frequently used taxon filter, if any session had one
    pub favorite_taxon: Option<IconicTaxon>,
}

/// Optional session persistence. The quiz runs without one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizSessionRepo: Send + Sync {
    /// Insert or replace a session snapshot.
    async fn save(&self, session: &QuizSession) -> Result<(), RepoError>;
    async fn get(&self, id: SessionId) -> Result<Option<QuizSession>, RepoError>;
    /// Most recently started sessions first.
    async fn list_for_user(
        &self,
        user_id: &PlayerId,
        limit: usize,
    ) -> Result<Vec<QuizSession>, RepoError>;
    async fn stats(&self, user_id: &PlayerId) -> Result<UserQuizStats, RepoError>;
}
