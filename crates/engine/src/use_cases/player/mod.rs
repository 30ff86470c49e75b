//! Player use cases.
//!
//! Registration, lookup and the XP leaderboard.

use std::sync::Arc;

mod error;
mod get_player;
mod leaderboard;
mod register;

pub use error::PlayerError;
pub use get_player::{GetPlayer, PlayerProfile};
pub use leaderboard::{Leaderboard, LeaderboardEntry, DEFAULT_LEADERBOARD_SIZE, MAX_LEADERBOARD_SIZE};
pub use register::{RegisterPlayer, RegisterPlayerRequest};

/// Container for player use cases.
pub struct PlayerUseCases {
    pub register: Arc<RegisterPlayer>,
    pub get: Arc<GetPlayer>,
    pub leaderboard: Arc<Leaderboard>,
}

impl PlayerUseCases {
    pub fn new(
        register: Arc<RegisterPlayer>,
        get: Arc<GetPlayer>,
        leaderboard: Arc<Leaderboard>,
    ) -> Self {
        Self {
            register,
            get,
            leaderboard,
        }
    }
}
