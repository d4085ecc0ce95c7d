//! Repository Ports
//!
//! Data access interfaces. The bundled server crate implements them
//! in-memory; a persistent backend plugs in behind the same traits.

mod cache_store;
mod prompt_store;
mod session_store;

pub use cache_store::*;
pub use prompt_store::*;
pub use session_store::*;
