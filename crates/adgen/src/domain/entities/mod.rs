//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Prompt: versioned templates with sector overrides and metrics
//! - Session: attempt tracking for one logical generation request
//! - Cache: content-addressable entries for accepted artifacts
//! - Validation: weighted scoring results

mod cache;
mod prompt;
mod session;
mod validation;

pub use cache::*;
pub use prompt::*;
pub use session::*;
pub use validation::*;
