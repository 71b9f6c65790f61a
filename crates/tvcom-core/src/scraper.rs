//! Main TV.com harvester API
//!
//! This module provides the high-level API for harvesting TV.com episode
//! listings. It combines the HTTP client with the page parsers and the
//! numbering normalizer: search for a show, then fetch its complete
//! multi-season episode list with a bounded number of parallel season
//! fetches.

use futures::stream::{self, StreamExt};

use crate::client::{ClientConfig, DocumentFetch, TvComClient};
use crate::error::{Result, TvComError};
use crate::normalize::normalize_episodes;
use crate::parser::{parse_episode_rows, parse_search_results, parse_season_count};
use crate::types::{Episode, SearchResult, SeasonFetchOutcome, SeasonLocator};

/// Human-readable name of the source catalog
pub const SOURCE_NAME: &str = "TV.com";

/// Fixed query template for the show search endpoint
const SEARCH_PATH: &str = "/search.php?type=Search&stype=ajax_search&search_type=program&qs=";

/// Upper bound on concurrently in-flight season fetches
const MAX_CONCURRENT_SEASON_FETCHES: usize = 12;

/// Harvester for TV.com episode listings
///
/// Provides show search and episode list aggregation. All operations are
/// asynchronous. Generic over the [`DocumentFetch`] transport; defaults to
/// the rate-limited [`TvComClient`].
///
/// # Example
/// ```no_run
/// use tvcom_core::TvComScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = TvComScraper::new()?;
///
///     let candidates = scraper.search("Buffy the Vampire Slayer").await?;
///     if let Some(show) = candidates.first() {
///         let episodes = scraper.get_episode_list(show).await?;
///         println!("{} episodes", episodes.len());
///     }
///
///     Ok(())
/// }
/// ```
pub struct TvComScraper<F = TvComClient> {
    client: F,
    base_url: String,
}

impl TvComScraper<TvComClient> {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new scraper with custom configuration.
    ///
    /// # Arguments
    /// * `config` - Client configuration (base host, rate, timeout)
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = TvComClient::with_config(&config)?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }
}

impl<F: DocumentFetch> TvComScraper<F> {
    /// Create a scraper over a custom transport.
    ///
    /// This is useful for testing the aggregation logic against a fake
    /// [`DocumentFetch`] implementation.
    ///
    /// # Arguments
    /// * `client` - Transport used for all document fetches
    /// * `base_url` - Base URL the search path is appended to
    pub fn with_client(client: F, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Name of the catalog site this scraper harvests.
    pub fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    /// URL of a candidate's episode listing page for one season.
    ///
    /// Season 0 addresses the all-seasons view.
    pub fn episode_list_url(&self, result: &SearchResult, season: u32) -> String {
        result.locator.season_url(season)
    }

    /// Search for shows by name.
    ///
    /// Returns candidates in source document order. Result rows whose link
    /// cannot be rewritten into a valid listing locator are dropped with a
    /// warning rather than failing the search; duplicates pass through.
    ///
    /// # Arguments
    /// * `term` - Search term
    ///
    /// # Returns
    /// * `Ok(Vec<SearchResult>)` with matching shows
    /// * `Err(TvComError::InvalidQuery)` if the term is empty or
    ///   whitespace-only
    ///
    /// # Example
    /// ```no_run
    /// use tvcom_core::TvComScraper;
    ///
    /// # async fn example() -> Result<(), tvcom_core::TvComError> {
    /// let scraper = TvComScraper::new()?;
    /// for show in scraper.search("Doctor Who").await? {
    ///     println!("{}", show.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, term: &str) -> Result<Vec<SearchResult>> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Err(TvComError::InvalidQuery(
                "Search term cannot be empty".to_string(),
            ));
        }

        let url = format!(
            "{}{}{}",
            self.base_url,
            SEARCH_PATH,
            urlencoding::encode(trimmed)
        );

        let html = self.client.fetch(&url).await?;
        parse_search_results(&html)
    }

    /// Get the complete multi-season episode list for a candidate.
    ///
    /// Fetches the season 1 listing first (it doubles as the source for
    /// season-count discovery), then fetches the remaining seasons with at
    /// most 12 requests in flight. Episodes
    /// are returned grouped by season in ascending order, with in-season
    /// source order preserved, regardless of fetch completion order.
    ///
    /// All-or-nothing: if any season fetch fails, the whole call fails with
    /// that season's error and no partial list is returned. Season fetches
    /// already in flight run to completion; their results are discarded.
    ///
    /// # Example
    /// ```no_run
    /// use tvcom_core::TvComScraper;
    ///
    /// # async fn example() -> Result<(), tvcom_core::TvComError> {
    /// let scraper = TvComScraper::new()?;
    /// let candidates = scraper.search("Doctor Who").await?;
    /// let episodes = scraper.get_episode_list(&candidates[0]).await?;
    /// for ep in episodes {
    ///     println!("{:?} {} {}", ep.season, ep.number, ep.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_episode_list(&self, result: &SearchResult) -> Result<Vec<Episode>> {
        let html = self.client.fetch(&result.locator.season_url(1)).await?;
        let season_count = parse_season_count(&html)?;

        let rows = parse_episode_rows(&html)?;
        let mut episodes = normalize_episodes(&result.name, 1, &rows);

        if season_count > 1 {
            // Cap concurrent fetches so we don't open too many connections
            let cap = (season_count as usize - 1).min(MAX_CONCURRENT_SEASON_FETCHES);
            tracing::debug!(seasons = season_count, cap, "fetching remaining seasons");

            let mut outcomes: Vec<SeasonFetchOutcome> = stream::iter(2..=season_count)
                .map(|season| async move {
                    SeasonFetchOutcome {
                        season,
                        outcome: self.get_season_episode_list(result, season).await,
                    }
                })
                .buffer_unordered(cap)
                .collect()
                .await;

            // Completion order is arbitrary; output order is by season
            outcomes.sort_by_key(|o| o.season);

            for outcome in outcomes {
                episodes.extend(outcome.outcome?);
            }
        }

        Ok(episodes)
    }

    /// Get the episode list for a single season of a candidate.
    ///
    /// One fetch, parse and normalize for the requested season index; no
    /// season-count discovery and no concurrency.
    pub async fn get_season_episode_list(
        &self,
        result: &SearchResult,
        season: u32,
    ) -> Result<Vec<Episode>> {
        let html = self.client.fetch(&result.locator.season_url(season)).await?;
        let rows = parse_episode_rows(&html)?;
        Ok(normalize_episodes(&result.name, season, &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListingLocator;

    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing_page(season_count: u32, rows: &[(&str, &str)]) -> String {
        let mut options = String::from("<option>All Seasons</option>");
        for season in 1..=season_count {
            options.push_str(&format!("<option>Season {season}</option>"));
        }

        let mut body = String::new();
        for (rank, title) in rows {
            body.push_str(&format!(
                r##"<tr><td>{rank}</td><td class="ep_title"><a href="#">{title}</a></td></tr>"##
            ));
        }

        format!(
            r#"<html><body><div id="eps_table">
                <form><select name="season">{options}</select></form>
                <table>{body}</table>
            </div></body></html>"#
        )
    }

    fn search_page(listing_base: &str) -> String {
        format!(
            r#"<html><body>
                <h3 class="title"><a href="{listing_base}/show/firefly/summary.html?full_summary=1">Firefly</a></h3>
            </body></html>"#
        )
    }

    fn test_config(base_url: String) -> ClientConfig {
        ClientConfig {
            base_url,
            requests_per_second: 1000.0,
            timeout_secs: 5,
        }
    }

    fn candidate(base_url: &str) -> SearchResult {
        SearchResult {
            name: "Firefly".to_string(),
            locator: ListingLocator::parse(&format!(
                "{base_url}/show/firefly/episode_listings.html"
            ))
            .unwrap(),
        }
    }

    async fn mount_season(
        server: &MockServer,
        season: u32,
        template: ResponseTemplate,
    ) {
        Mock::given(method("GET"))
            .and(path("/show/firefly/episode_listings.html"))
            .and(query_param("season", season.to_string().as_str()))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_search_empty_term() {
        let scraper = TvComScraper::new().unwrap();
        let result = scraper.search("   ").await;

        match result {
            Err(TvComError::InvalidQuery(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidQuery error"),
        }
    }

    #[tokio::test]
    async fn test_search_rewrites_candidate_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.php"))
            .and(query_param("qs", "Firefly"))
            .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&server.uri())))
            .mount(&server)
            .await;

        let scraper = TvComScraper::with_config(test_config(server.uri())).unwrap();
        let candidates = scraper.search("Firefly").await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Firefly");
        assert_eq!(
            candidates[0].locator.as_str(),
            format!("{}/show/firefly/episode_listings.html", server.uri())
        );
    }

    #[tokio::test]
    async fn test_get_episode_list_single_season() {
        let server = MockServer::start().await;
        mount_season(
            &server,
            1,
            ResponseTemplate::new(200)
                .set_body_string(listing_page(1, &[("1", "Serenity"), ("2", "The Train Job")])),
        )
        .await;

        let scraper = TvComScraper::with_config(test_config(server.uri())).unwrap();
        let episodes = scraper
            .get_episode_list(&candidate(&server.uri()))
            .await
            .unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].number, "01");
        assert_eq!(episodes[0].title, "Serenity");
        assert_eq!(episodes[1].number, "02");
        assert!(episodes.iter().all(|e| e.season == Some("1".to_string())));
    }

    #[tokio::test]
    async fn test_get_episode_list_orders_seasons_despite_completion_order() {
        let server = MockServer::start().await;
        mount_season(
            &server,
            1,
            ResponseTemplate::new(200)
                .set_body_string(listing_page(3, &[("1", "s1e1"), ("2", "s1e2")])),
        )
        .await;
        // Season 2 finishes last, season 3 first
        mount_season(
            &server,
            2,
            ResponseTemplate::new(200)
                .set_body_string(listing_page(3, &[("1", "s2e1"), ("2", "s2e2")]))
                .set_delay(Duration::from_millis(120)),
        )
        .await;
        mount_season(
            &server,
            3,
            ResponseTemplate::new(200)
                .set_body_string(listing_page(3, &[("1", "s3e1")]))
                .set_delay(Duration::from_millis(10)),
        )
        .await;

        let scraper = TvComScraper::with_config(test_config(server.uri())).unwrap();
        let episodes = scraper
            .get_episode_list(&candidate(&server.uri()))
            .await
            .unwrap();

        let titles: Vec<&str> = episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["s1e1", "s1e2", "s2e1", "s2e2", "s3e1"]);

        let seasons: Vec<Option<&str>> = episodes.iter().map(|e| e.season.as_deref()).collect();
        assert_eq!(
            seasons,
            [Some("1"), Some("1"), Some("2"), Some("2"), Some("3")]
        );
    }

    #[tokio::test]
    async fn test_get_episode_list_fails_whole_call_on_season_failure() {
        let server = MockServer::start().await;
        mount_season(
            &server,
            1,
            ResponseTemplate::new(200).set_body_string(listing_page(3, &[("1", "s1e1")])),
        )
        .await;
        mount_season(
            &server,
            2,
            ResponseTemplate::new(200).set_body_string(listing_page(3, &[("1", "s2e1")])),
        )
        .await;
        mount_season(&server, 3, ResponseTemplate::new(404)).await;

        let scraper = TvComScraper::with_config(test_config(server.uri())).unwrap();
        let result = scraper.get_episode_list(&candidate(&server.uri())).await;

        // No partial season 1+2 list is ever returned
        match result {
            Err(TvComError::NotFound(url)) => assert!(url.contains("season=3")),
            other => panic!("Expected NotFound error, got {:?}", other.map(|e| e.len())),
        }
    }

    #[tokio::test]
    async fn test_get_season_episode_list_skips_discovery() {
        let server = MockServer::start().await;
        mount_season(
            &server,
            2,
            ResponseTemplate::new(200)
                .set_body_string(listing_page(3, &[("1", "s2e1"), ("2", "s2e2")])),
        )
        .await;

        let scraper = TvComScraper::with_config(test_config(server.uri())).unwrap();
        let episodes = scraper
            .get_season_episode_list(&candidate(&server.uri()), 2)
            .await
            .unwrap();

        assert_eq!(episodes.len(), 2);
        assert!(episodes.iter().all(|e| e.season == Some("2".to_string())));
    }

    #[tokio::test]
    async fn test_get_episode_list_idempotent() {
        let server = MockServer::start().await;
        mount_season(
            &server,
            1,
            ResponseTemplate::new(200)
                .set_body_string(listing_page(2, &[("Pilot", "Unaired Pilot"), ("1", "s1e1")])),
        )
        .await;
        mount_season(
            &server,
            2,
            ResponseTemplate::new(200).set_body_string(listing_page(2, &[("1", "s2e1")])),
        )
        .await;

        let scraper = TvComScraper::with_config(test_config(server.uri())).unwrap();
        let result = candidate(&server.uri());

        let first = scraper.get_episode_list(&result).await.unwrap();
        let second = scraper.get_episode_list(&result).await.unwrap();

        assert_eq!(first, second);
    }

    /// Fake transport that serves synthetic listings and records the
    /// high-water mark of concurrently in-flight fetches.
    struct CountingFetch {
        seasons: u32,
        in_flight: Arc<AtomicUsize>,
        high_water: Arc<AtomicUsize>,
    }

    impl DocumentFetch for CountingFetch {
        fn fetch(&self, _url: &str) -> impl Future<Output = Result<String>> + Send {
            let in_flight = Arc::clone(&self.in_flight);
            let high_water = Arc::clone(&self.high_water);
            let body = listing_page(self.seasons, &[("1", "Episode")]);

            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                high_water.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(25)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(body)
            }
        }
    }

    #[tokio::test]
    async fn test_season_fetch_concurrency_is_capped() {
        let high_water = Arc::new(AtomicUsize::new(0));
        let fetch = CountingFetch {
            seasons: 20,
            in_flight: Arc::new(AtomicUsize::new(0)),
            high_water: Arc::clone(&high_water),
        };

        let scraper = TvComScraper::with_client(fetch, "http://tv.test");
        let result = SearchResult {
            name: "Show".to_string(),
            locator: ListingLocator::parse("http://tv.test/show/x/episode_listings.html").unwrap(),
        };

        let episodes = scraper.get_episode_list(&result).await.unwrap();
        assert_eq!(episodes.len(), 20);

        let peak = high_water.load(Ordering::SeqCst);
        assert!(peak <= MAX_CONCURRENT_SEASON_FETCHES, "peak in-flight {peak}");
        assert!(peak > 1, "season fetches never overlapped");
    }
}
