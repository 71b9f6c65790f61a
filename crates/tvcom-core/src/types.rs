//! Data types for the TV.com harvester
//!
//! This module contains all the core data structures used throughout the library.
//! Public value types implement Serialize and Deserialize for JSON compatibility.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A value that can derive the episode listing URL for a given season.
///
/// Listing pages are addressed per season through this capability rather
/// than through concrete URL types, so that other catalog sites with a
/// different addressing scheme only need their own locator variant.
pub trait SeasonLocator {
    /// URL of the episode listing page for `season`.
    ///
    /// Season 0 addresses the "all seasons" view.
    fn season_url(&self, season: u32) -> String;
}

/// Locator for a show's episode listing pages on TV.com.
///
/// Wraps a validated absolute URL of the show's `episode_listings.html`
/// page. Seasons are addressed by appending a `season` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingLocator(String);

impl ListingLocator {
    /// Parse a listing locator from an href.
    ///
    /// Returns `None` if the href is not a valid absolute URL (e.g. a
    /// relative or empty anchor scraped from a malformed result row).
    pub fn parse(href: &str) -> Option<Self> {
        let url = reqwest::Url::parse(href).ok()?;
        Some(Self(String::from(url)))
    }

    /// The underlying listing page URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SeasonLocator for ListingLocator {
    fn season_url(&self, season: u32) -> String {
        format!("{}?season={}", self.0, season)
    }
}

/// Search result item from a TV.com show search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display name of the show
    pub name: String,
    /// Locator for the show's episode listing pages
    pub locator: ListingLocator,
}

/// One aired episode from a listing
///
/// Within an aggregated list, episodes of season S precede those of season
/// S+1 and in-season source order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Name of the show the episode belongs to
    pub series: String,
    /// Season number as text; `None` when the source row carried a
    /// non-numeric label ("Pilot", "Special", "TV Movie", ...)
    pub season: Option<String>,
    /// Episode number, zero-padded to the season's width for numeric rows,
    /// the raw source label otherwise
    pub number: String,
    /// Episode title
    pub title: String,
}

/// Raw (rank text, title) pair extracted from one listing table row.
///
/// Intermediate shape between listing parse and number normalization;
/// not re-exported from the crate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEpisodeRow {
    /// First-cell text, usually the episode number but possibly a label
    pub rank: String,
    /// Episode title text
    pub title: String,
}

/// Fan-in envelope for one season fetch task.
///
/// Tags the outcome with the season it was assigned so the aggregator can
/// reassemble results in season order regardless of completion order.
pub(crate) struct SeasonFetchOutcome {
    pub(crate) season: u32,
    pub(crate) outcome: Result<Vec<Episode>>,
}
