//! Ports
//!
//! Abstract interfaces the pipeline depends on. Repositories cover
//! persistence of prompts, sessions and cache entries; services cover
//! the external generative-model collaborators, the job status source
//! and pluggable criterion scoring.

pub mod repositories;
pub mod services;

pub use repositories::*;
pub use services::*;
