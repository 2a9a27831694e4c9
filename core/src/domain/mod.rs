//! Domain layer containing business entities and domain events.

pub mod entities;
pub mod events;

// Re-export commonly used domain types
pub use entities::*;
pub use events::AccountEvent;
