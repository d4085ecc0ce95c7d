//! Pipeline Services
//!
//! The adaptive generation pipeline: prompt registry, quality
//! validator, orchestrator retry loop, session tracking, artifact
//! cache and the client-side progress poller.

mod cache;
mod fingerprint;
mod orchestrator;
mod poller;
mod prompt_builder;
mod registry;
mod session;
mod validator;

pub use cache::*;
pub use fingerprint::*;
pub use orchestrator::*;
pub use poller::*;
pub use prompt_builder::*;
pub use registry::*;
pub use session::*;
pub use validator::*;
