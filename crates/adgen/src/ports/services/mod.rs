//! Service Ports
//!
//! External collaborator interfaces. Text and image generation are
//! black boxes consumed through a fixed request/response contract;
//! the status source feeds the progress poller; criterion scorers
//! plug domain-specific signals into the validator.

mod criterion_scorer;
mod image_generator;
mod status_source;
mod text_generator;

pub use criterion_scorer::*;
pub use image_generator::*;
pub use status_source::*;
pub use text_generator::*;
