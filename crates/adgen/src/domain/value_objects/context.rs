//! Generation Context
//!
//! Caller-supplied context for one generation request. The subset
//! { purpose, sector, style } participates in cache fingerprints.

use serde::{Deserialize, Serialize};

/// What an artifact is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Social,
    Product,
    Lifestyle,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Social => "social",
            Purpose::Product => "product",
            Purpose::Lifestyle => "lifestyle",
        }
    }

    /// Platform-appropriate aspect ratio for this purpose
    pub fn aspect_ratio(&self) -> &'static str {
        match self {
            Purpose::Social => "1:1",
            Purpose::Product => "3:4",
            Purpose::Lifestyle => "16:9",
        }
    }
}

/// Context for one logical generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationContext {
    pub purpose: Purpose,
    pub sector: String,
    /// Communication style hint ("minimaliste", "audacieux", ...)
    pub style: Option<String>,
    /// Market positioning hint ("premium", "luxury", ...)
    pub positioning: Option<String>,
    pub time_of_day: Option<String>,
    pub brand: Option<String>,
}

impl GenerationContext {
    pub fn new(purpose: Purpose, sector: impl Into<String>) -> Self {
        Self {
            purpose,
            sector: sector.into(),
            style: None,
            positioning: None,
            time_of_day: None,
            brand: None,
        }
    }
}
