//! Registry of in-flight quiz sessions.
//!
//! Each session sits behind its own async mutex so requests for one session
//! are serialized while different sessions proceed in parallel. Every lookup
//! refreshes the entry's last-touched time so idle sessions can be swept.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use naturieux_domain::{QuizSession, SessionId};
use tokio::sync::Mutex;

pub type SessionHandle = Arc<Mutex<QuizSession>>;

struct ActiveEntry {
    handle: SessionHandle,
    last_touched: DateTime<Utc>,
}

#[derive(Default)]
pub struct ActiveSessions {
    sessions: DashMap<SessionId, ActiveEntry>,
}

impl ActiveSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a session and return its id.
    pub fn insert(&self, session: QuizSession, now: DateTime<Utc>) -> SessionId {
        let id = session.id();
        self.sessions.insert(
            id,
            ActiveEntry {
                handle: Arc::new(Mutex::new(session)),
                last_touched: now,
            },
        );
        id
    }

    /// Handle for `id`, marking it touched at `now`. The map guard is
    /// released before this returns, so the handle may be locked across awaits.
    pub fn get(&self, id: SessionId, now: DateTime<Utc>) -> Option<SessionHandle> {
        self.sessions.get_mut(&id).map(|mut entry| {
            entry.last_touched = entry.last_touched.max(now);
            Arc::clone(&entry.handle)
        })
    }

    pub fn remove(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.remove(&id).map(|(_, entry)| entry.handle)
    }

    /// Remove every session last touched before `cutoff` and hand them back.
    pub fn take_idle(&self, cutoff: DateTime<Utc>) -> Vec<(SessionId, SessionHandle)> {
        let stale: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|entry| entry.last_touched < cutoff)
            .map(|entry| *entry.key())
            .collect();

        stale
            .into_iter()
            .filter_map(|id| {
                // re-checked under the shard lock: a request may have touched it since
                self.sessions
                    .remove_if(&id, |_, entry| entry.last_touched < cutoff)
                    .map(|(id, entry)| (id, entry.handle))
            })
            .collect()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use naturieux_domain::{
        Choice, Difficulty, PlayerId, Question, QuestionId, QuizType, ScientificName,
        SessionConfig, Species, SpeciesId,
    };

    fn session() -> QuizSession {
        let correct = Species::new(SpeciesId::new(1).unwrap(), ScientificName::new("Apis mellifera").unwrap());
        let decoy = Species::new(SpeciesId::new(2).unwrap(), ScientificName::new("Bombus terrestris").unwrap());
        let question = Question::new(
            QuestionId::new(),
            QuizType::Image,
            Difficulty::Beginner,
            correct.clone(),
            vec![Choice::correct(correct), Choice::wrong(decoy)],
            "https://img.example/apis.jpg",
        )
        .unwrap();
        QuizSession::new(SessionConfig {
            user_id: PlayerId::new("p1").unwrap(),
            difficulty: Difficulty::Beginner,
            quiz_types: vec![QuizType::Image],
            taxon_filter: None,
            questions: vec![question],
        })
        .unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 2, 2, 2, 2).unwrap()
    }

    #[test]
    fn insert_get_remove() {
        let registry = ActiveSessions::new();
        assert!(registry.is_empty());

        let id = registry.insert(session(), t0());
        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(id, t0()).is_some());

        assert!(registry.remove(id).is_some());
        assert!(registry.get(id, t0()).is_none());
        assert!(registry.remove(id).is_none());
    }

    #[test]
    fn take_idle_removes_only_stale_sessions() {
        let registry = ActiveSessions::new();
        let idle = registry.insert(session(), t0());
        let busy = registry.insert(session(), t0());
        registry.get(busy, t0() + Duration::minutes(20));

        let taken = registry.take_idle(t0() + Duration::minutes(10));
        let ids: Vec<SessionId> = taken.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![idle]);
        assert!(!registry.contains(idle));
        assert!(registry.contains(busy));

        assert!(registry.take_idle(t0() + Duration::minutes(10)).is_empty());
    }

    #[test]
    fn stale_lookup_never_moves_touch_time_backwards() {
        let registry = ActiveSessions::new();
        let id = registry.insert(session(), t0() + Duration::minutes(5));
        registry.get(id, t0());

        assert!(registry.take_idle(t0() + Duration::minutes(1)).is_empty());
        assert_eq!(registry.take_idle(t0() + Duration::minutes(6)).len(), 1);
    }

    #[tokio::test]
    async fn handles_share_one_session() {
        let registry = ActiveSessions::new();
        let now = t0();
        let id = registry.insert(session(), now);

        let first = registry.get(id, now).unwrap();
        first.lock().await.start(now).unwrap();

        let second = registry.get(id, now).unwrap();
        assert!(second.lock().await.started_at().is_some());
    }

    #[tokio::test]
    async fn concurrent_submissions_are_serialized() {
        let registry = Arc::new(ActiveSessions::new());
        let now = t0();
        let id = registry.insert(session(), now);
        registry.get(id, now).unwrap().lock().await.start(now).unwrap();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let handle = registry.get(id, now).unwrap();
                let mut session = handle.lock().await;
                session
                    .submit_answer(SpeciesId::new(1).unwrap(), chrono::Duration::seconds(1), now)
                    .is_ok()
            }));
        }

        let mut accepted = 0;
        for task in tasks {
            if task.await.unwrap() {
                accepted += 1;
            }
        }
        // single question: exactly one submission can land
        assert_eq!(accepted, 1);
        assert_eq!(registry.get(id, now).unwrap().lock().await.answered_count(), 1);
    }
}
