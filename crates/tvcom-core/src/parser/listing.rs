//! Episode listing parser for TV.com
//!
//! Parses HTML from a season's episode listing page: the raw episode rows
//! and the season count advertised by the listing's season drop-down.

use scraper::{Html, Selector};

use crate::error::{Result, TvComError};
use crate::types::RawEpisodeRow;

/// Drop-down entry that addresses the all-seasons view, not a season
const ALL_SEASONS_SENTINEL: &str = "All Seasons";

/// Extract raw episode rows from a listing page.
///
/// A row qualifies when it carries an episode title cell; its first cell
/// holds the rank text (usually the episode number, sometimes a label like
/// "Pilot") and the title cell's anchor holds the episode title. A page
/// without matching rows yields an empty vec, never an error.
pub fn parse_episode_rows(html: &str) -> Result<Vec<RawEpisodeRow>> {
    let document = Html::parse_document(html);

    let row_selector = Selector::parse("#eps_table tr")
        .map_err(|e| TvComError::ParseError(format!("Invalid selector: {:?}", e)))?;
    let title_selector = Selector::parse("td.ep_title a")
        .map_err(|e| TvComError::ParseError(format!("Invalid selector: {:?}", e)))?;
    let cell_selector = Selector::parse("td")
        .map_err(|e| TvComError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let mut rows = Vec::new();

    for row in document.select(&row_selector) {
        let Some(title_link) = row.select(&title_selector).next() else {
            continue;
        };

        let rank = row
            .select(&cell_selector)
            .next()
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let title = title_link.text().collect::<String>().trim().to_string();

        rows.push(RawEpisodeRow { rank, title });
    }

    Ok(rows)
}

/// Count the seasons advertised by the listing's season drop-down.
///
/// The "All Seasons" entry is a view over every season, not a season of its
/// own, and is excluded. A page without a drop-down yields 0; callers treat
/// counts below 2 as "the current document is the entire listing".
pub fn parse_season_count(html: &str) -> Result<u32> {
    let document = Html::parse_document(html);

    let option_selector = Selector::parse(r#"#eps_table select[name="season"] option"#)
        .map_err(|e| TvComError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let count = document
        .select(&option_selector)
        .filter(|option| option.text().collect::<String>().trim() != ALL_SEASONS_SENTINEL)
        .count();

    Ok(count as u32)
}
