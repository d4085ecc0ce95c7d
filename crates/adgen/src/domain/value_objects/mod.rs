//! Value Objects
//!
//! Immutable value types shared across the pipeline.

mod artifact;
mod context;
mod job;
mod quality_tier;

pub use artifact::*;
pub use context::*;
pub use job::*;
pub use quality_tier::*;
