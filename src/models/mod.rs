// src/models/mod.rs

//! Domain models for the branchmap application.

mod branch;
mod config;

// Re-export all public types
pub use branch::{Branch, Person};
pub use config::{Config, CrawlerConfig, GeocoderConfig, SiteConfig, SiteSelectors};
