//! Session completion progression.
//!
//! Turns a completed session into player XP, level-ups and achievements, then
//! notifies the event sink. Everything here is best effort from the player's
//! point of view: the answer that completed the session stands even when this
//! fails.

use std::sync::Arc;

use naturieux_domain::{
    Achievement, AchievementUnlocked, GameEvent, QuizSession, SessionCompleted,
};
use serde::Serialize;

use crate::infrastructure::ports::{ClockPort, GameEventSink, PlayerRepo};

use super::error::QuizError;

const ACCURACY_BONUS_HIGH: i64 = 100;
const ACCURACY_BONUS_MEDIUM: i64 = 50;
const ACCURACY_THRESHOLD_HIGH: f64 = 90.0;
const ACCURACY_THRESHOLD_MEDIUM: f64 = 80.0;
const STREAK_XP_PER_STEP: i64 = 10;

/// XP earned by a finished session: score, accuracy bonus and streak bonus.
pub fn session_xp(session: &QuizSession) -> i64 {
    let accuracy = session.accuracy();
    let accuracy_bonus = if accuracy >= ACCURACY_THRESHOLD_HIGH {
        ACCURACY_BONUS_HIGH
    } else if accuracy >= ACCURACY_THRESHOLD_MEDIUM {
        ACCURACY_BONUS_MEDIUM
    } else {
        0
    };

    i64::from(session.total_score())
        + accuracy_bonus
        + i64::from(session.max_streak()) * STREAK_XP_PER_STEP
}

/// What the player gained from a completed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionSummary {
    /// Session XP, excluding achievement rewards
    pub xp_awarded: u64,
    pub achievement_xp: u64,
    pub level: u32,
    pub total_xp: u64,
    pub levels_gained: u32,
    pub new_achievements: Vec<Achievement>,
}

pub struct SessionProgression {
    players: Arc<dyn PlayerRepo>,
    events: Option<Arc<dyn GameEventSink>>,
    clock: Arc<dyn ClockPort>,
}

impl SessionProgression {
    pub fn new(
        players: Arc<dyn PlayerRepo>,
        events: Option<Arc<dyn GameEventSink>>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            players,
            events,
            clock,
        }
    }

    /// Apply a completed session to its player and publish the resulting events.
    pub async fn apply(&self, session: &QuizSession) -> Result<ProgressionSummary, QuizError> {
        let now = self.clock.now();
        let mut player = self
            .players
            .get(session.user_id())
            .await?
            .ok_or_else(|| QuizError::not_found("Player", session.user_id()))?;

        let level_before = player.level();
        let xp = session_xp(session);
        let mut events: Vec<GameEvent> = player
            .add_xp(xp, now)
            .into_iter()
            .map(GameEvent::LevelUp)
            .collect();

        let correct = count(session.correct_count());
        let total = count(session.questions_count());
        let mut unlocked = player.record_game(correct, total, session.max_streak(), now);
        unlocked.extend(player.record_difficulty_clear(session.difficulty(), session.accuracy()));

        let mut achievement_xp = 0u64;
        for achievement in &unlocked {
            let reward = achievement.xp_reward();
            achievement_xp += u64::from(reward);
            events.push(GameEvent::AchievementUnlocked(AchievementUnlocked {
                player_id: player.id().clone(),
                achievement: *achievement,
                xp_reward: reward,
                occurred_at: now,
            }));
            events.extend(
                player
                    .add_xp(i64::from(reward), now)
                    .into_iter()
                    .map(GameEvent::LevelUp),
            );
        }

        self.players.update(&player).await?;

        let xp_awarded = u64::try_from(xp).unwrap_or(0);
        events.push(GameEvent::SessionCompleted(SessionCompleted {
            session_id: session.id(),
            player_id: player.id().clone(),
            difficulty: session.difficulty(),
            total_score: session.total_score(),
            correct_count: correct,
            questions_count: total,
            accuracy: session.accuracy(),
            max_streak: session.max_streak(),
            xp_awarded,
            player_level: player.level(),
            player_total_xp: player.total_xp(),
            occurred_at: now,
        }));
        self.publish(&events).await;

        tracing::info!(
            session_id = %session.id(),
            user_id = %player.id(),
            xp = xp_awarded,
            achievement_xp,
            level = player.level(),
            achievements = unlocked.len(),
            "Session progression applied"
        );

        Ok(ProgressionSummary {
            xp_awarded,
            achievement_xp,
            level: player.level(),
            total_xp: player.total_xp(),
            levels_gained: player.level() - level_before,
            new_achievements: unlocked,
        })
    }

    async fn publish(&self, events: &[GameEvent]) {
        let Some(sink) = &self.events else {
            return;
        };

        for event in events {
            let result = match event {
                GameEvent::LevelUp(e) => sink.level_up(e).await,
                GameEvent::AchievementUnlocked(e) => sink.achievement_unlocked(e).await,
                GameEvent::SessionCompleted(e) => sink.session_completed(e).await,
            };
            if let Err(e) = result {
                tracing::warn!(
                    player_id = %event.player_id(),
                    error = %e,
                    "Failed to publish game event"
                );
            }
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
