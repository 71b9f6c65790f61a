//! HTML parsers for TV.com pages
//!
//! This module contains parsers for extracting data from TV.com HTML pages:
//! - `search`: Parse show search results and rewrite listing links
//! - `listing`: Parse episode listing pages and the season drop-down

pub mod listing;
pub mod search;

// Re-export main parsing functions
pub use listing::{parse_episode_rows, parse_season_count};
pub use search::{parse_search_results, rewrite_listing_href};
