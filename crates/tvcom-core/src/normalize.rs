//! Episode numbering normalization
//!
//! Listing rows carry a raw rank text in their first cell. For most rows it
//! is the in-season episode number, but the source numbering does not
//! reliably start at 1 (a "Pilot" row may precede the numbered episodes, or
//! a season may continue the previous season's numbering), and some rows
//! are not numbered at all ("Special", "TV Movie"). This module turns those
//! raw rows into [`Episode`] values with consistent, zero-padded in-season
//! numbers.

use crate::types::{Episode, RawEpisodeRow};

/// Normalize one season's raw rows into episodes.
///
/// Pure and deterministic; never fails. The numbering offset is inferred
/// from the first row whose rank parses as an integer: that row becomes
/// episode 1 of the season. Non-numeric ranks are passed through verbatim
/// as the episode number and get no season, preserving human-readable
/// labels instead of discarding the row.
///
/// Numbers are zero-padded to `max(2, digits(rows.len()))`.
///
/// # Example
/// ```
/// use tvcom_core::normalize_episodes;
/// use tvcom_core::types::RawEpisodeRow;
///
/// let rows = vec![
///     RawEpisodeRow { rank: "Pilot".to_string(), title: "Unaired Pilot".to_string() },
///     RawEpisodeRow { rank: "1".to_string(), title: "Welcome to the Hellmouth".to_string() },
/// ];
/// let episodes = normalize_episodes("Buffy the Vampire Slayer", 1, &rows);
///
/// assert_eq!(episodes[0].number, "Pilot");
/// assert_eq!(episodes[0].season, None);
/// assert_eq!(episodes[1].number, "01");
/// assert_eq!(episodes[1].season, Some("1".to_string()));
/// ```
pub fn normalize_episodes(series: &str, season: u32, rows: &[RawEpisodeRow]) -> Vec<Episode> {
    let width = pad_width(rows.len());
    let mut offset: Option<i64> = None;

    let mut episodes = Vec::with_capacity(rows.len());
    for row in rows {
        match row.rank.parse::<i64>() {
            Ok(rank) => {
                // First numeric row establishes the season's offset
                let offset = *offset.get_or_insert(rank - 1);
                episodes.push(Episode {
                    series: series.to_string(),
                    season: Some(season.to_string()),
                    number: format!("{:0width$}", rank - offset),
                    title: row.title.clone(),
                });
            }
            Err(_) => {
                // Rank may be "Pilot", "Special", "TV Movie" ...
                episodes.push(Episode {
                    series: series.to_string(),
                    season: None,
                    number: row.rank.clone(),
                    title: row.title.clone(),
                });
            }
        }
    }

    episodes
}

/// Zero-pad width for a season with `row_count` rows, minimum 2.
fn pad_width(row_count: usize) -> usize {
    row_count.to_string().len().max(2)
}
