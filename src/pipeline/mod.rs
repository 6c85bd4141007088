//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Crawl the branch locator and emit the collected records

pub mod crawl;

pub use crawl::run_crawler;
