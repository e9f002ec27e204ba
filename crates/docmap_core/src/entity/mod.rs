//! Entities and their lifecycle.

mod model;
mod state;

pub use model::Entity;
pub use state::EntityState;
