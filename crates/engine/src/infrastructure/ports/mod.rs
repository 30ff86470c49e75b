//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Player and session storage (in-memory today, a database tomorrow)
//! - The species catalog (fixture file or a remote taxonomy service)
//! - Game event delivery
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{PlayerRepo, QuizSessionRepo, UserQuizStats};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{GameEventSink, SpeciesCatalog, SpeciesFilter};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockPlayerRepo, MockQuizSessionRepo};

#[cfg(test)]
pub use external::{MockGameEventSink, MockSpeciesCatalog};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{CatalogError, EventSinkError, RepoError};
