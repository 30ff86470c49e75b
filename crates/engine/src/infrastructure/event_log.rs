//! Game event sink that writes events to the tracing log.

use async_trait::async_trait;
use naturieux_domain::{AchievementUnlocked, LevelUpEvent, SessionCompleted};

use crate::infrastructure::ports::{EventSinkError, GameEventSink};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GameEventSink for TracingEventSink {
    async fn session_completed(&self, event: &SessionCompleted) -> Result<(), EventSinkError> {
        tracing::info!(
            session_id = %event.session_id,
            player_id = %event.player_id,
            difficulty = %event.difficulty,
            total_score = event.total_score,
            correct = event.correct_count,
            questions = event.questions_count,
            accuracy = event.accuracy,
            max_streak = event.max_streak,
            xp_awarded = event.xp_awarded,
            level = event.player_level,
            "Session completed"
        );
        Ok(())
    }

    async fn level_up(&self, event: &LevelUpEvent) -> Result<(), EventSinkError> {
        tracing::info!(
            player_id = %event.player_id,
            new_level = event.new_level,
            total_xp = event.total_xp,
            "Player levelled up"
        );
        Ok(())
    }

    async fn achievement_unlocked(&self, event: &AchievementUnlocked) -> Result<(), EventSinkError> {
        tracing::info!(
            player_id = %event.player_id,
            achievement = %event.achievement,
            xp_reward = event.xp_reward,
            "Achievement unlocked"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use naturieux_domain::PlayerId;

    #[tokio::test]
    async fn never_fails() {
        let sink = TracingEventSink::new();
        let event = LevelUpEvent {
            player_id: PlayerId::new("p1").unwrap(),
            new_level: 2,
            total_xp: 100,
            occurred_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        };
        assert!(sink.level_up(&event).await.is_ok());
    }
}
