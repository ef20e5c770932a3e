//! Query and mode filtering
//!
//! Filtering never reorders: the output is a subsequence of the catalog.

use super::{Mode, RecommendationQuery};
use crate::catalog::{Catalog, CatalogEntry};
use tracing::debug;

/// Entries with `|z| >= Z_BAND` on the mode's z-score are outliers
pub const Z_BAND: f64 = 2.0;

pub const MIN_HIDDEN_GEM_SCORE: f64 = 1.0;
pub const MIN_POPULAR_IMDB: f64 = 7.5;
pub const MIN_POPULAR_VOTES: f64 = 5_000.0;
pub const MIN_CRITICS_METACRITIC: f64 = 70.0;

/// Genre and year checks shared by every mode
pub fn matches_query(entry: &CatalogEntry, query: &RecommendationQuery) -> bool {
    let record = &entry.record;

    if !record.genres.contains(query.genre.as_str()) {
        return false;
    }
    if query.year_min.is_some_and(|min| record.release_year < min) {
        return false;
    }
    if query.year_max.is_some_and(|max| record.release_year > max) {
        return false;
    }
    true
}

/// Mode-specific inclusion rules
pub fn passes_mode(entry: &CatalogEntry, mode: Mode) -> bool {
    let record = &entry.record;
    let metrics = &entry.metrics;

    match mode {
        Mode::HiddenGem => {
            metrics.z_hidden_gem.abs() < Z_BAND && metrics.hidden_gem_score >= MIN_HIDDEN_GEM_SCORE
        }
        Mode::Popular => {
            metrics.z_imdb.abs() < Z_BAND
                && record.imdb_score >= MIN_POPULAR_IMDB
                && record.imdb_votes >= MIN_POPULAR_VOTES
        }
        // No z-band here: Metacritic coverage is too sparse for it to mean much.
        Mode::CriticsPick => record
            .metacritic_score
            .is_some_and(|score| score >= MIN_CRITICS_METACRITIC),
    }
}

/// Entries matching the query's genre and years, then the mode's rules
pub fn apply<'a>(catalog: &'a Catalog, query: &RecommendationQuery, mode: Mode) -> Vec<&'a CatalogEntry> {
    let matched: Vec<&CatalogEntry> = catalog
        .entries()
        .iter()
        .filter(|entry| matches_query(entry, query))
        .collect();
    let matched_count = matched.len();

    let included: Vec<&CatalogEntry> = matched.into_iter().filter(|entry| passes_mode(entry, mode)).collect();

    debug!(
        genre = %query.genre,
        matched = matched_count,
        included = included.len(),
        mode = mode.key(),
        "filtered catalog"
    );
    included
}
