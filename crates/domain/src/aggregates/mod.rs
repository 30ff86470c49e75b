//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns domain events or outcomes from mutations
//!
//! Neither aggregate synchronizes internally. Callers serialize mutations
//! per aggregate (one exclusive handle per session, read-modify-write per
//! player).

pub mod player;
pub mod quiz_session;

pub use player::{xp_for_level, xp_required_to_reach, Player, MAX_LEVEL};
pub use quiz_session::{Answer, QuizSession, SessionConfig, SessionStatus};
