//! HTTP adapters for the external collaborator ports.

pub mod image;
pub mod text;

pub use image::HttpImageGenerator;
pub use text::HttpTextGenerator;
