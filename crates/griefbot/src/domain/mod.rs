//! Domain Layer
//!
//! Pure domain logic without infrastructure dependencies.
//! Contains the profile catalog, entities, value objects and errors.

pub mod catalog;
pub mod entities;
pub mod errors;
pub mod value_objects;

// Re-exports for convenience
pub use catalog::*;
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
