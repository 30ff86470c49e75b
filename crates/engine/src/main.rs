//! Naturieux quiz engine - demo entry point.
//!
//! Plays one quiz session against the bundled species catalog and logs the
//! outcome.

use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use naturieux_engine::infrastructure::app_settings::QuizSettings;
use naturieux_engine::use_cases::player::{PlayerError, RegisterPlayerRequest};
use naturieux_engine::use_cases::quiz::{StartSessionRequest, SubmitAnswerRequest};
use naturieux_engine::App;

const DEMO_PLAYER_ID: &str = "demo-player";
const DEMO_USERNAME: &str = "naturalist";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root so `cargo run -p naturieux-engine` picks up `.env`.
    load_dotenv_from_repo_root();

    let settings = QuizSettings::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        question_count = settings.default_question_count,
        taxon_filter = ?settings.taxon_filter,
        place_id = ?settings.place_id,
        "Starting Naturieux quiz engine"
    );

    let app = App::in_memory(settings)?;

    match app
        .register_player(RegisterPlayerRequest {
            player_id: DEMO_PLAYER_ID.to_string(),
            username: DEMO_USERNAME.to_string(),
        })
        .await
    {
        Ok(_) | Err(PlayerError::AlreadyExists(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let started = app
        .start_session(StartSessionRequest {
            user_id: DEMO_PLAYER_ID.to_string(),
            difficulty: Some("beginner".to_string()),
            quiz_types: vec!["image".to_string(), "flash".to_string()],
            ..Default::default()
        })
        .await?;
    tracing::info!(
        session_id = %started.session_id,
        total_questions = started.total_questions,
        "Demo session started"
    );

    let mut next = started.first_question;
    while let Some(question) = next.take() {
        // Guess uniformly among the choices, like a player who knows nothing.
        let (pick, time_taken_ms) = {
            let mut rng = rand::thread_rng();
            let pick = rng.gen_range(0..question.choices().len());
            (pick, rng.gen_range(1_500..12_000))
        };
        let guess = &question.choices()[pick].species;

        let response = app
            .submit_answer(
                started.session_id,
                SubmitAnswerRequest {
                    species_id: guess.id().get(),
                    time_taken_ms,
                },
            )
            .await?;

        tracing::info!(
            quiz_type = %question.quiz_type(),
            guess = %guess.display_name(),
            answer = %response.correct_name,
            is_correct = response.is_correct,
            score = response.score,
            streak = response.current_streak,
            "Question answered"
        );

        if let Some(summary) = &response.progression {
            tracing::info!(
                xp_awarded = summary.xp_awarded,
                level = summary.level,
                total_xp = summary.total_xp,
                achievements = ?summary.new_achievements,
                "Progression applied"
            );
        }
        next = response.next_question;
    }

    let stats = app.session_stats(DEMO_PLAYER_ID).await?;
    let profile = app.player_profile(DEMO_PLAYER_ID).await?;
    tracing::info!(
        sessions = stats.total_sessions,
        accuracy = stats.average_accuracy,
        level = profile.level,
        total_xp = profile.total_xp,
        xp_to_next_level = profile.xp_to_next_level,
        "Demo finished"
    );

    for entry in app.leaderboard(0).await? {
        tracing::info!(
            rank = entry.rank,
            username = %entry.username,
            level = entry.level,
            total_xp = entry.total_xp,
            "Leaderboard"
        );
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
