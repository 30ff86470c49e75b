//! In-memory adapters for the storage and catalog ports.
//!
//! Nothing here is durable. Used by the demo binary and integration tests.

mod catalog;
mod players;
mod sessions;

pub use catalog::StaticSpeciesCatalog;
pub use players::InMemoryPlayerRepo;
pub use sessions::InMemorySessionRepo;
