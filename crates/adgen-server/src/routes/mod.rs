//! Adgen API Routes
//!
//! - POST /adgen/jobs           - trigger a generation job
//! - GET  /adgen/jobs/:id/status - fast-path status report
//! - GET  /adgen/jobs/:id/items  - raw item listing (fallback path)

pub mod jobs;
