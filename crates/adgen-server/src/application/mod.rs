//! Application services (use cases) for the adgen API.

pub mod generation_service;
pub mod job_tracker;

pub use generation_service::GenerationService;
pub use job_tracker::JobTracker;
