//! TV.com Harvester Core Library
//!
//! This crate provides the core scraping functionality for TV.com episode
//! listings.
//!
//! # Features
//! - Search for TV shows by name
//! - Fetch complete multi-season episode lists, with remaining seasons
//!   fetched in parallel under a fixed concurrency cap
//! - Episode numbering normalization: per-season offset inference and
//!   zero padding, with non-numeric labels ("Pilot", "Special") preserved
//! - Rate-limited HTTP client to avoid server overload

pub mod client;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use crate::client::{ClientConfig, DocumentFetch, RateLimiter, TvComClient};
pub use crate::error::{Result, TvComError};
pub use crate::normalize::normalize_episodes;
pub use crate::scraper::TvComScraper;
pub use crate::types::{Episode, ListingLocator, SearchResult, SeasonLocator};
