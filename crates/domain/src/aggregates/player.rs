//! Player aggregate - experience, levels, lifetime stats and achievements
//!
//! Only two operations move a player's progression: [`Player::add_xp`] and
//! [`Player::record_game`] (plus [`Player::record_difficulty_clear`] for the
//! difficulty-gated achievements). XP and level never decrease and the
//! achievement set only grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::LevelUpEvent;
use crate::value_objects::{Achievement, Difficulty, Username};
use crate::PlayerId;

/// Hard level cap. No level-ups are granted past this regardless of XP.
pub const MAX_LEVEL: u32 = 100;

const BASE_LEVEL_XP: f64 = 100.0;
const LEVEL_XP_GROWTH: f64 = 1.5;

/// XP needed to clear level `level`: `floor(100 * 1.5^(level-1))`.
///
/// Saturates at `u64::MAX` for levels whose requirement does not fit.
pub fn xp_for_level(level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    // float-to-int `as` saturates
    (BASE_LEVEL_XP * LEVEL_XP_GROWTH.powi(exponent)).floor() as u64
}

/// Cumulative XP from scratch needed to stand at `level`.
///
/// `xp_required_to_reach(1) == 0`, `xp_required_to_reach(2) == 100`,
/// `xp_required_to_reach(3) == 250`.
pub fn xp_required_to_reach(level: u32) -> u64 {
    (1..level).fold(0u64, |acc, n| acc.saturating_add(xp_for_level(n)))
}

/// A player and their progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    username: Username,
    total_xp: u64,
    level: u32,
    games_played: u32,
    questions_answered: u32,
    correct_answers: u32,
    best_streak: u32,
    achievements: Vec<Achievement>,
    daily_streak: u32,
    last_played_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, username: Username, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username,
            total_xp: 0,
            level: 1,
            games_played: 0,
            questions_answered: 0,
            correct_answers: 0,
            best_streak: 0,
            achievements: Vec::new(),
            daily_streak: 0,
            last_played_at: None,
            created_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    #[inline]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[inline]
    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    #[inline]
    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    #[inline]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[inline]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Consecutive days with at least one recorded game.
    #[inline]
    pub fn daily_streak(&self) -> u32 {
        self.daily_streak
    }

    /// Unlocked achievements in unlock order.
    #[inline]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    #[inline]
    pub fn last_played_at(&self) -> Option<DateTime<Utc>> {
        self.last_played_at
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    /// Lifetime percentage of correct answers (0 before any question).
    pub fn accuracy(&self) -> f64 {
        if self.questions_answered == 0 {
            return 0.0;
        }
        f64::from(self.correct_answers) / f64::from(self.questions_answered) * 100.0
    }

    /// XP still missing before the next level-up. 0 at the level cap.
    pub fn xp_to_next_level(&self) -> u64 {
        if self.level >= MAX_LEVEL {
            return 0;
        }
        xp_required_to_reach(self.level + 1).saturating_sub(self.total_xp)
    }

    /// Percentage of the current level already earned. 100 at the level cap.
    pub fn xp_progress(&self) -> f64 {
        if self.level >= MAX_LEVEL {
            return 100.0;
        }
        let into_level = self.total_xp.saturating_sub(xp_required_to_reach(self.level));
        into_level as f64 / xp_for_level(self.level) as f64 * 100.0
    }

    // =========================================================================
    // Progression
    // =========================================================================

    /// Add XP and apply every level-up it unlocks.
    ///
    /// Non-positive amounts are ignored. One event is returned per level
    /// gained, stopping at [`MAX_LEVEL`].
    pub fn add_xp(&mut self, amount: i64, now: DateTime<Utc>) -> Vec<LevelUpEvent> {
        if amount <= 0 {
            return Vec::new();
        }
        self.total_xp = self.total_xp.saturating_add(amount.unsigned_abs());

        let mut events = Vec::new();
        while self.level < MAX_LEVEL && self.total_xp >= xp_required_to_reach(self.level + 1) {
            self.level += 1;
            events.push(LevelUpEvent {
                player_id: self.id.clone(),
                new_level: self.level,
                total_xp: self.total_xp,
                occurred_at: now,
            });
        }
        events
    }

    /// Record a finished game and return the achievements it newly unlocked.
    pub fn record_game(
        &mut self,
        correct: u32,
        total: u32,
        max_streak: u32,
        now: DateTime<Utc>,
    ) -> Vec<Achievement> {
        self.games_played = self.games_played.saturating_add(1);
        self.correct_answers = self.correct_answers.saturating_add(correct);
        self.questions_answered = self.questions_answered.saturating_add(total);
        self.best_streak = self.best_streak.max(max_streak);

        match self.last_played_at {
            None => self.daily_streak = 1,
            Some(last) => match (now - last).num_days() {
                1 => self.daily_streak = self.daily_streak.saturating_add(1),
                days if days > 1 => self.daily_streak = 1,
                _ => {}
            },
        }
        self.last_played_at = Some(now);

        let checks = [
            (Achievement::FirstGame, self.games_played >= 1),
            (Achievement::Veteran, self.games_played >= 100),
            (Achievement::StreakMaster, self.best_streak >= 10),
            (
                Achievement::PerfectScore,
                self.questions_answered >= 10 && self.correct_answers == self.questions_answered,
            ),
            (Achievement::Dedicated, self.daily_streak >= 7),
            (Achievement::LevelTen, self.level >= 10),
            (Achievement::LevelFifty, self.level >= 50),
        ];
        self.unlock_all(checks)
    }

    /// Unlock the difficulty-gated achievements for a completed session.
    pub fn record_difficulty_clear(&mut self, difficulty: Difficulty, accuracy: f64) -> Vec<Achievement> {
        let checks = [
            (
                Achievement::ExpertMode,
                matches!(difficulty, Difficulty::Expert | Difficulty::Master),
            ),
            (
                Achievement::MasterNaturalist,
                difficulty == Difficulty::Master && accuracy >= 80.0,
            ),
        ];
        self.unlock_all(checks)
    }

    fn unlock_all<const N: usize>(&mut self, checks: [(Achievement, bool); N]) -> Vec<Achievement> {
        let mut unlocked = Vec::new();
        for (achievement, satisfied) in checks {
            if satisfied && !self.has_achievement(achievement) {
                self.achievements.push(achievement);
                unlocked.push(achievement);
            }
        }
        unlocked
    }
}
