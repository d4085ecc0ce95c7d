//! In-memory implementations of the store ports.
//!
//! The process-local backend. Each store is a tokio RwLock map behind
//! the corresponding port, so swapping in a durable backend is a
//! wiring change in main.rs and nothing else.

pub mod cache_store;
pub mod prompt_store;
pub mod session_store;

pub use cache_store::MemCacheStore;
pub use prompt_store::MemPromptStore;
pub use session_store::MemSessionStore;
