//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate domain aggregates through the port traits.

pub mod player;
pub mod quiz;

pub use player::PlayerUseCases;
pub use quiz::QuizUseCases;
