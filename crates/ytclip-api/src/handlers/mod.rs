//! Request handlers.

pub mod clips;
pub mod health;

pub use clips::create_clips;
pub use health::{health, root};
