//! Entities - domain objects with identity that are not aggregate roots.

pub mod question;
pub mod species;

pub use question::{Choice, Question, MIN_CHOICES};
pub use species::{Photo, Species};
