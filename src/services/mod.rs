//! Service layer for the branchmap application.
//!
//! This module contains the business logic for:
//! - Crawl orchestration (`BranchCrawler`)
//! - Address geocoding (`Geocoder`, `GoogleGeocoder`)
//! - Staff-block parsing (`staff`)
//! - Branch record accumulation (`BranchStore`)

mod crawler;
mod geocoder;
pub mod staff;
mod store;

pub use crawler::{BranchCrawler, CrawlOutcome, PageKind};
pub use geocoder::{Geocoder, GoogleGeocoder};
pub use store::BranchStore;
