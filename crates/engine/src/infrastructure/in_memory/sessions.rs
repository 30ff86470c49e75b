use std::collections::HashMap;

use async_trait::async_trait;
use naturieux_domain::{IconicTaxon, PlayerId, QuizSession, SessionId, SessionStatus};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{QuizSessionRepo, RepoError, UserQuizStats};

/// Session snapshots keyed by id. Stats aggregate completed sessions only.
#[derive(Default)]
pub struct InMemorySessionRepo {
    sessions: RwLock<HashMap<SessionId, QuizSession>>,
}

impl InMemorySessionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Most used taxon filter. Ties go to the earlier group in [`IconicTaxon::ALL`].
fn favorite_taxon<'a>(sessions: impl Iterator<Item = &'a QuizSession>) -> Option<IconicTaxon> {
    let mut counts: HashMap<IconicTaxon, u32> = HashMap::new();
    for taxon in sessions.filter_map(|s| s.taxon_filter()) {
        *counts.entry(taxon).or_default() += 1;
    }
    IconicTaxon::ALL
        .iter()
        .filter_map(|t| counts.get(t).map(|n| (*t, *n)))
        .fold(None, |best: Option<(IconicTaxon, u32)>, (t, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((t, n)),
        })
        .map(|(t, _)| t)
}

#[async_trait]
impl QuizSessionRepo for InMemorySessionRepo {
    async fn save(&self, session: &QuizSession) -> Result<(), RepoError> {
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Option<QuizSession>, RepoError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &PlayerId,
        limit: usize,
    ) -> Result<Vec<QuizSession>, RepoError> {
        let mut sessions: Vec<QuizSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.started_at().cmp(&a.started_at()));
        sessions.truncate(limit);
        Ok(sessions)
    }

    async fn stats(&self, user_id: &PlayerId) -> Result<UserQuizStats, RepoError> {
        let sessions = self.sessions.read().await;
        let completed: Vec<&QuizSession> = sessions
            .values()
            .filter(|s| s.user_id() == user_id && s.status() == SessionStatus::Completed)
            .collect();

        if completed.is_empty() {
            return Ok(UserQuizStats::default());
        }

        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let accuracy_sum: f64 = completed.iter().map(|s| s.accuracy()).sum();

        Ok(UserQuizStats {
            total_sessions: count(completed.len()),
            total_questions: count(completed.iter().map(|s| s.answered_count()).sum()),
            total_correct: count(completed.iter().map(|s| s.correct_count()).sum()),
            total_score: completed.iter().map(|s| u64::from(s.total_score())).sum(),
            average_accuracy: accuracy_sum / completed.len() as f64,
            best_streak: completed.iter().map(|s| s.max_streak()).max().unwrap_or(0),
            favorite_taxon: favorite_taxon(completed.iter().copied()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use naturieux_domain::{
        Choice, Difficulty, Question, QuestionId, QuizType, ScientificName, SessionConfig,
        Species, SpeciesId,
    };

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()
    }

    fn question() -> Question {
        let correct = Species::new(SpeciesId::new(1).unwrap(), ScientificName::new("Parus major").unwrap());
        let decoy = Species::new(SpeciesId::new(2).unwrap(), ScientificName::new("Cyanistes caeruleus").unwrap());
        Question::new(
            QuestionId::new(),
            QuizType::Image,
            Difficulty::Beginner,
            correct.clone(),
            vec![Choice::correct(correct), Choice::wrong(decoy)],
            "https://img.example/tit.jpg",
        )
        .unwrap()
    }

    /// A session for `user` answered with `answers` (true = correct), started at `start`.
    fn played(user: &str, taxon: Option<IconicTaxon>, answers: &[bool], start: DateTime<Utc>) -> QuizSession {
        let mut session = QuizSession::new(SessionConfig {
            user_id: PlayerId::new(user).unwrap(),
            difficulty: Difficulty::Beginner,
            quiz_types: vec![QuizType::Image],
            taxon_filter: taxon,
            questions: answers.iter().map(|_| question()).collect(),
        })
        .unwrap();
        session.start(start).unwrap();
        for correct in answers {
            let pick = if *correct { 1 } else { 2 };
            session
                .submit_answer(SpeciesId::new(pick).unwrap(), Duration::seconds(30), start)
                .unwrap();
        }
        session
    }

    #[tokio::test]
    async fn save_overwrites_snapshot() {
        let repo = InMemorySessionRepo::new();
        let mut session = QuizSession::new(SessionConfig {
            user_id: PlayerId::new("p1").unwrap(),
            difficulty: Difficulty::Beginner,
            quiz_types: vec![QuizType::Image],
            taxon_filter: None,
            questions: vec![question()],
        })
        .unwrap();
        repo.save(&session).await.unwrap();

        session.start(t0()).unwrap();
        repo.save(&session).await.unwrap();

        let stored = repo.get(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), SessionStatus::InProgress);
        assert!(repo.get(SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_per_user() {
        let repo = InMemorySessionRepo::new();
        let old = played("p1", None, &[true], t0());
        let new = played("p1", None, &[true], t0() + Duration::hours(1));
        let other = played("p2", None, &[true], t0());
        for s in [&old, &new, &other] {
            repo.save(s).await.unwrap();
        }

        let listed = repo.list_for_user(&PlayerId::new("p1").unwrap(), 10).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![new.id(), old.id()]);

        let limited = repo.list_for_user(&PlayerId::new("p1").unwrap(), 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn stats_aggregate_completed_sessions() {
        let repo = InMemorySessionRepo::new();
        repo.save(&played("p1", Some(IconicTaxon::Aves), &[true, true, true, true], t0()))
            .await
            .unwrap();
        repo.save(&played("p1", Some(IconicTaxon::Aves), &[true, false], t0()))
            .await
            .unwrap();
        repo.save(&played("p1", Some(IconicTaxon::Fungi), &[false, false], t0()))
            .await
            .unwrap();

        let mut abandoned = QuizSession::new(SessionConfig {
            user_id: PlayerId::new("p1").unwrap(),
            difficulty: Difficulty::Beginner,
            quiz_types: vec![QuizType::Image],
            taxon_filter: Some(IconicTaxon::Fungi),
            questions: vec![question()],
        })
        .unwrap();
        abandoned.abandon(t0()).unwrap();
        repo.save(&abandoned).await.unwrap();

        let stats = repo.stats(&PlayerId::new("p1").unwrap()).await.unwrap();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_questions, 8);
        assert_eq!(stats.total_correct, 5);
        assert_eq!(stats.best_streak, 4);
        assert!((stats.average_accuracy - 50.0).abs() < 1e-9);
        assert_eq!(stats.favorite_taxon, Some(IconicTaxon::Aves));
    }

    #[tokio::test]
    async fn stats_for_newcomer_are_zero() {
        let repo = InMemorySessionRepo::new();
        let stats = repo.stats(&PlayerId::new("nobody").unwrap()).await.unwrap();
        assert_eq!(stats, UserQuizStats::default());
    }
}
