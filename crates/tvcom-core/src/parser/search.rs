//! Search results parser for TV.com
//!
//! Parses HTML from show search pages and rewrites result links into
//! episode listing locators.

use scraper::{Html, Selector};

use crate::error::{Result, TvComError};
use crate::types::{ListingLocator, SearchResult};

/// Suffix pattern of a show summary link, rewritten to the listing page
const SUMMARY_SUFFIX: &str = r"summary\.html\?.*$";

/// File name of the episode listing page
const LISTING_PAGE: &str = "episode_listings.html";

/// Parse show candidates from a TV.com search results page.
///
/// Candidates are returned in document order. Rows whose link cannot be
/// rewritten into a valid listing locator are dropped with a warning;
/// a partially usable result page is still a successful search.
///
/// # Arguments
/// * `html` - Raw HTML content of the search results page
pub fn parse_search_results(html: &str) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);

    let anchor_selector = Selector::parse("h3.title > a")
        .map_err(|e| TvComError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let mut results = Vec::new();

    for anchor in document.select(&anchor_selector) {
        let name = anchor.text().collect::<String>().trim().to_string();
        let href = anchor.value().attr("href").unwrap_or_default();

        match rewrite_listing_href(href) {
            Some(locator) => results.push(SearchResult { name, locator }),
            None => tracing::warn!(href, "dropping search result with malformed link"),
        }
    }

    Ok(results)
}

/// Rewrite a summary-page href into an episode listing locator.
///
/// Replaces the `summary.html?...` suffix with `episode_listings.html`;
/// an href without that suffix is taken as-is. Returns `None` when the
/// rewritten href is not a valid absolute URL.
pub fn rewrite_listing_href(href: &str) -> Option<ListingLocator> {
    let re = regex_lite::Regex::new(SUMMARY_SUFFIX).ok()?;
    let rewritten = re.replace(href, LISTING_PAGE);
    ListingLocator::parse(&rewritten)
}
