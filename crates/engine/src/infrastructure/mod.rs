//! Infrastructure implementations.
//!
//! Port traits plus the adapters shipped with the engine.

pub mod app_settings;
pub mod clock;
pub mod event_log;
pub mod in_memory;
pub mod ports;
