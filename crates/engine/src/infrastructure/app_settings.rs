//! Quiz settings
//!
//! Defaults for session start and the question assembler, overridable from
//! the environment. `.env.local` / `.env` are loaded by the binary before
//! [`QuizSettings::from_env`] runs.
//!
//! Supported environment variables:
//! - `NATURIEUX_QUESTION_COUNT`: questions per session when a request gives none (1-100)
//! - `NATURIEUX_MAX_QUESTION_COUNT`: upper bound on questions a request may ask for (1-1000)
//! - `NATURIEUX_SESSION_IDLE_SECS`: seconds an active session may sit untouched before eviction
//! - `NATURIEUX_TAXON_FILTER`: default iconic taxon for questions (e.g. `Aves`)
//! - `NATURIEUX_PLACE_ID`: default geographic place for questions
//! - `NATURIEUX_LOG`: fallback tracing filter when `RUST_LOG` is unset
//!
//! Invalid values are ignored with a warning.

use naturieux_domain::IconicTaxon;
use serde::{Deserialize, Serialize};

pub const QUESTION_COUNT_VAR: &str = "NATURIEUX_QUESTION_COUNT";
pub const MAX_QUESTION_COUNT_VAR: &str = "NATURIEUX_MAX_QUESTION_COUNT";
pub const SESSION_IDLE_VAR: &str = "NATURIEUX_SESSION_IDLE_SECS";
pub const TAXON_FILTER_VAR: &str = "NATURIEUX_TAXON_FILTER";
pub const PLACE_ID_VAR: &str = "NATURIEUX_PLACE_ID";
pub const LOG_FILTER_VAR: &str = "NATURIEUX_LOG";

const MAX_QUESTION_COUNT: u32 = 100;
const QUESTION_COUNT_CEILING: u32 = 1000;

fn default_question_count() -> u32 {
    10
}

fn default_max_question_count() -> u32 {
    MAX_QUESTION_COUNT
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_log_filter() -> String {
    "naturieux_engine=debug".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSettings {
    #[serde(default = "default_question_count")]
    pub default_question_count: u32,
    /// Larger requested counts are clamped to this
    #[serde(default = "default_max_question_count")]
    pub max_question_count: u32,
    /// Active sessions untouched for longer are abandoned and evicted
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    #[serde(default)]
    pub taxon_filter: Option<IconicTaxon>,
    #[serde(default)]
    pub place_id: Option<u32>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            default_question_count: default_question_count(),
            max_question_count: default_max_question_count(),
            session_idle_secs: default_session_idle_secs(),
            taxon_filter: None,
            place_id: None,
            log_filter: default_log_filter(),
        }
    }
}

impl QuizSettings {
    /// How long an active session may sit idle.
    pub fn session_idle_timeout(&self) -> chrono::Duration {
        let secs = i64::try_from(self.session_idle_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        chrono::Duration::seconds(secs)
    }

    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(val) = lookup(QUESTION_COUNT_VAR) {
            match val.trim().parse::<u32>() {
                Ok(count) if (1..=MAX_QUESTION_COUNT).contains(&count) => {
                    settings.default_question_count = count;
                    tracing::info!(count, "Applied NATURIEUX_QUESTION_COUNT environment variable");
                }
                Ok(count) => {
                    tracing::warn!(count, "NATURIEUX_QUESTION_COUNT out of range [1, 100], ignoring");
                }
                Err(_) => {
                    tracing::warn!(val = %val, "NATURIEUX_QUESTION_COUNT is not a valid u32, ignoring");
                }
            }
        }

        if let Some(val) = lookup(MAX_QUESTION_COUNT_VAR) {
            match val.trim().parse::<u32>() {
                Ok(max) if (1..=QUESTION_COUNT_CEILING).contains(&max) => {
                    settings.max_question_count = max;
                    tracing::info!(max, "Applied NATURIEUX_MAX_QUESTION_COUNT environment variable");
                }
                _ => {
                    tracing::warn!(val = %val, "NATURIEUX_MAX_QUESTION_COUNT out of range [1, 1000], ignoring");
                }
            }
        }

        if let Some(val) = lookup(SESSION_IDLE_VAR) {
            match val.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.session_idle_secs = secs,
                _ => tracing::warn!(val = %val, "NATURIEUX_SESSION_IDLE_SECS is not a positive integer, ignoring"),
            }
        }

        if settings.default_question_count > settings.max_question_count {
            tracing::warn!(
                default = settings.default_question_count,
                max = settings.max_question_count,
                "Default question count exceeds the maximum, lowering it"
            );
            settings.default_question_count = settings.max_question_count;
        }

        if let Some(val) = lookup(TAXON_FILTER_VAR).filter(|v| !v.trim().is_empty()) {
            match val.parse::<IconicTaxon>() {
                Ok(taxon) => {
                    settings.taxon_filter = Some(taxon);
                    tracing::info!(taxon = %taxon, "Applied NATURIEUX_TAXON_FILTER environment variable");
                }
                Err(e) => {
                    tracing::warn!(val = %val, error = %e, "NATURIEUX_TAXON_FILTER is not a known taxon, ignoring");
                }
            }
        }

        if let Some(val) = lookup(PLACE_ID_VAR).filter(|v| !v.trim().is_empty()) {
            match val.trim().parse::<u32>() {
                Ok(place_id) if place_id > 0 => settings.place_id = Some(place_id),
                _ => tracing::warn!(val = %val, "NATURIEUX_PLACE_ID is not a positive integer, ignoring"),
            }
        }

        if let Some(val) = lookup(LOG_FILTER_VAR).filter(|v| !v.trim().is_empty()) {
            settings.log_filter = val.trim().to_string();
        }

        settings
    }
}
