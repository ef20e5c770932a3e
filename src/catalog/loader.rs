//! CSV ingestion
//!
//! Reads a catalog export with the columns
//! `Title, Genre, Release Date, IMDb Score, IMDb Votes, Metacritic Score`
//! (other columns are ignored) and coerces each row into a
//! [`ContentRecord`]. Rows that fail coercion are counted and skipped.

use super::ContentRecord;
use crate::error::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

/// Release date layouts seen in catalog exports, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Genre", default)]
    genre: Option<String>,
    #[serde(rename = "Release Date", default)]
    release_date: Option<String>,
    #[serde(rename = "IMDb Score", default)]
    imdb_score: Option<String>,
    #[serde(rename = "IMDb Votes", default)]
    imdb_votes: Option<String>,
    #[serde(rename = "Metacritic Score", default)]
    metacritic_score: Option<String>,
}

impl RawRow {
    fn into_record(self) -> Option<ContentRecord> {
        let title = non_blank(self.title)?;
        let genres = non_blank(self.genre)?;
        let release_year = self.release_date.as_deref().and_then(parse_release_year)?;
        let imdb_score = self.imdb_score.as_deref().and_then(parse_number)?;
        let imdb_votes = self.imdb_votes.as_deref().and_then(parse_count)?;
        let metacritic_score = self.metacritic_score.as_deref().and_then(parse_number);

        Some(ContentRecord {
            title,
            genres,
            release_year,
            imdb_score,
            imdb_votes,
            metacritic_score,
        })
    }
}

/// Typed rows plus the number of data rows seen
#[derive(Debug, Default)]
pub struct LoadedRows {
    pub records: Vec<ContentRecord>,
    pub rows_read: usize,
}

/// Parse every row of a CSV catalog.
///
/// Malformed rows are skipped; only I/O failures abort the load.
pub fn read<R: Read>(reader: R) -> Result<LoadedRows> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut loaded = LoadedRows::default();
    for row in rdr.deserialize::<RawRow>() {
        loaded.rows_read += 1;
        match row {
            Ok(raw) => {
                if let Some(record) = raw.into_record() {
                    loaded.records.push(record);
                }
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => debug!(row = loaded.rows_read, error = %e, "skipping unreadable row"),
        }
    }

    Ok(loaded)
}

/// Year of a release date, or `None` if no known layout matches
pub fn parse_release_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.year());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.year());
        }
    }

    // Bare year
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().ok();
    }

    None
}

/// Finite number, tolerating surrounding whitespace
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Vote count, which may carry thousands separators ("146,000")
pub fn parse_count(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    parse_number(&cleaned)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
