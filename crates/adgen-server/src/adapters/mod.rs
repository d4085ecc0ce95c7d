//! Infrastructure adapters for the adgen domain ports.

pub mod http;
pub mod memory;
pub mod scoring;

pub use http::{HttpImageGenerator, HttpTextGenerator};
pub use memory::{MemCacheStore, MemPromptStore, MemSessionStore};
pub use scoring::TextScorer;
