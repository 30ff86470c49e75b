//! Application state and composition.

use std::sync::Arc;

use naturieux_domain::{Question, SessionId};

use crate::infrastructure::{
    app_settings::QuizSettings,
    clock::{SystemClock, SystemRandom},
    event_log::TracingEventSink,
    in_memory::{InMemoryPlayerRepo, InMemorySessionRepo, StaticSpeciesCatalog},
    ports::{
        CatalogError, ClockPort, GameEventSink, PlayerRepo, QuizSessionRepo, RandomPort,
        SpeciesCatalog, UserQuizStats,
    },
};
use crate::use_cases::player::{
    GetPlayer, Leaderboard, LeaderboardEntry, PlayerError, PlayerProfile, RegisterPlayer,
    RegisterPlayerRequest,
};
use crate::use_cases::quiz::{
    AbandonSession, ActiveSessions, GetSessionStats, QuestionAssembler, QuizError,
    SessionProgression, StartSession, StartSessionRequest, StartSessionResponse, SubmitAnswer,
    SubmitAnswerRequest, SubmitAnswerResponse,
};
use crate::use_cases::{PlayerUseCases, QuizUseCases};

/// Main application state.
///
/// Owns the use cases and the registry of in-flight sessions. Transports
/// call the facade methods below; each locks the session it touches for the
/// whole call. Sessions left idle past `settings.session_idle_secs` are
/// abandoned by [`App::evict_idle_sessions`], which every start also runs.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub settings: QuizSettings,
    active: ActiveSessions,
    clock: Arc<dyn ClockPort>,
}

/// Port implementations the app is composed from.
pub struct Repositories {
    pub players: Arc<dyn PlayerRepo>,
    /// Optional: sessions live only in memory without it
    pub sessions: Option<Arc<dyn QuizSessionRepo>>,
    pub catalog: Arc<dyn SpeciesCatalog>,
}

/// Container for all use cases.
pub struct UseCases {
    pub quiz: QuizUseCases,
    pub player: PlayerUseCases,
}

impl App {
    /// Create a new App on the system clock and random source.
    pub fn new(
        repositories: Repositories,
        events: Option<Arc<dyn GameEventSink>>,
        settings: QuizSettings,
    ) -> Self {
        Self::with_ports(
            repositories,
            events,
            settings,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
    }

    /// Create a new App with all dependencies wired up.
    pub fn with_ports(
        repositories: Repositories,
        events: Option<Arc<dyn GameEventSink>>,
        settings: QuizSettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let assembler = Arc::new(
            QuestionAssembler::new(repositories.catalog.clone(), random)
                .with_taxon_filter(settings.taxon_filter)
                .with_place_filter(settings.place_id),
        );
        let progression = Arc::new(SessionProgression::new(
            repositories.players.clone(),
            events,
            clock.clone(),
        ));

        let quiz = QuizUseCases::new(
            Arc::new(StartSession::new(
                assembler,
                repositories.players.clone(),
                repositories.sessions.clone(),
                clock.clone(),
                settings.default_question_count,
                settings.max_question_count,
            )),
            Arc::new(SubmitAnswer::new(
                repositories.sessions.clone(),
                progression,
                clock.clone(),
            )),
            Arc::new(AbandonSession::new(
                repositories.sessions.clone(),
                clock.clone(),
            )),
            Arc::new(GetSessionStats::new(repositories.sessions.clone())),
        );

        let player = PlayerUseCases::new(
            Arc::new(RegisterPlayer::new(repositories.players.clone(), clock.clone())),
            Arc::new(GetPlayer::new(repositories.players.clone())),
            Arc::new(Leaderboard::new(repositories.players.clone())),
        );

        Self {
            repositories,
            use_cases: UseCases { quiz, player },
            settings,
            active: ActiveSessions::new(),
            clock,
        }
    }

    /// In-memory stores, the bundled species fixture and a logging event sink.
    pub fn in_memory(settings: QuizSettings) -> Result<Self, CatalogError> {
        let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());
        Self::in_memory_with_ports(settings, Arc::new(SystemClock::new()), random)
    }

    pub fn in_memory_with_ports(
        settings: QuizSettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Result<Self, CatalogError> {
        let catalog = StaticSpeciesCatalog::bundled(random.clone())?;
        let repositories = Repositories {
            players: Arc::new(InMemoryPlayerRepo::new()),
            sessions: Some(Arc::new(InMemorySessionRepo::new())),
            catalog: Arc::new(catalog),
        };
        let events: Arc<dyn GameEventSink> = Arc::new(TracingEventSink::new());
        Ok(Self::with_ports(
            repositories,
            Some(events),
            settings,
            clock,
            random,
        ))
    }

    // =========================================================================
    // Quiz
    // =========================================================================

    /// Start a session and keep it in the active registry.
    pub async fn start_session(
        &self,
        request: StartSessionRequest,
    ) -> Result<StartSessionResponse, QuizError> {
        self.evict_idle_sessions().await;

        let session = self.use_cases.quiz.start.execute(request).await?;
        let response = StartSessionResponse::from(&session);
        self.active.insert(session, self.clock.now());
        Ok(response)
    }

    /// Answer the current question of an active session. The session leaves
    /// the registry once it completes.
    pub async fn submit_answer(
        &self,
        session_id: SessionId,
        request: SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, QuizError> {
        let handle = self
            .active
            .get(session_id, self.clock.now())
            .ok_or_else(|| QuizError::not_found("Session", session_id))?;
        let mut session = handle.lock().await;

        let result = self.use_cases.quiz.submit.execute(&mut session, request).await;
        if session.status().is_terminal() {
            self.active.remove(session_id);
        }
        result
    }

    pub async fn abandon_session(&self, session_id: SessionId) -> Result<(), QuizError> {
        let handle = self
            .active
            .get(session_id, self.clock.now())
            .ok_or_else(|| QuizError::not_found("Session", session_id))?;
        let mut session = handle.lock().await;

        let result = self.use_cases.quiz.abandon.execute(&mut session).await;
        if session.status().is_terminal() {
            self.active.remove(session_id);
        }
        result
    }

    /// The question an active session is waiting on.
    pub async fn current_question(&self, session_id: SessionId) -> Result<Question, QuizError> {
        let handle = self
            .active
            .get(session_id, self.clock.now())
            .ok_or_else(|| QuizError::not_found("Session", session_id))?;
        let session = handle.lock().await;
        session
            .current_question()
            .cloned()
            .ok_or_else(|| QuizError::State("No current question".to_string()))
    }

    pub fn active_session_count(&self) -> usize {
        self.active.len()
    }

    /// Abandon and drop every active session idle longer than the configured
    /// timeout. Returns how many were evicted.
    pub async fn evict_idle_sessions(&self) -> usize {
        let Some(cutoff) = self
            .clock
            .now()
            .checked_sub_signed(self.settings.session_idle_timeout())
        else {
            return 0;
        };
        let idle = self.active.take_idle(cutoff);
        let evicted = idle.len();

        for (session_id, handle) in idle {
            let mut session = handle.lock().await;
            if session.status().is_terminal() {
                continue;
            }
            if let Err(e) = self.use_cases.quiz.abandon.execute(&mut session).await {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to abandon idle session"
                );
            }
        }

        if evicted > 0 {
            tracing::info!(evicted, remaining = self.active.len(), "Evicted idle quiz sessions");
        }
        evicted
    }

    pub async fn session_stats(&self, user_id: &str) -> Result<UserQuizStats, QuizError> {
        self.use_cases.quiz.stats.execute(user_id).await
    }

    // =========================================================================
    // Players
    // =========================================================================

    pub async fn register_player(
        &self,
        request: RegisterPlayerRequest,
    ) -> Result<PlayerProfile, PlayerError> {
        let player = self.use_cases.player.register.execute(request).await?;
        Ok(PlayerProfile::from(&player))
    }

    pub async fn player_profile(&self, player_id: &str) -> Result<PlayerProfile, PlayerError> {
        self.use_cases.player.get.execute(player_id).await
    }

    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, PlayerError> {
        self.use_cases.player.leaderboard.execute(limit).await
    }
}
