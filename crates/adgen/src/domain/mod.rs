//! Domain Layer
//!
//! Pure business entities, value objects and error types.
//! No infrastructure dependencies.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::PipelineError;
pub use value_objects::*;
