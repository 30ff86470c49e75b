//! Naturieux quiz engine library.
//!
//! Orchestrates species-identification quizzes on top of `naturieux-domain`.
//!
//! ## Structure
//!
//! - `use_cases/` - Quiz and player flows over the domain aggregates
//! - `infrastructure/` - Port traits plus the in-memory and logging adapters
//! - `app` - Application composition and the session-registry facade

pub mod app;
pub mod infrastructure;
pub mod use_cases;


pub use app::App;
