//! The in-memory title catalog
//!
//! A [`Catalog`] is built once at startup from a CSV export and never mutated
//! afterwards. Every entry pairs the cleaned [`ContentRecord`] with its
//! [`DerivedMetrics`], which are computed across the *whole* catalog so that
//! the notion of an outlier stays the same for every query.
//!
//! # Load-time cleaning
//!
//! Rows missing a title, genre, parseable release date, IMDb score or IMDb vote
//! count are dropped without being reported individually. Rows with a vote
//! count of zero are dropped too, since the Hidden Gem Score divides by
//! `votes^0.1`. Only the totals end up in the [`LoadReport`].

pub mod loader;
pub mod metrics;

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub use metrics::{ColumnStats, DerivedMetrics};

/// One catalog title with every required field coerced to its type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub title: String,
    /// Free-text genre tags, e.g. "Action, Adventure"
    pub genres: String,
    pub release_year: i32,
    pub imdb_score: f64,
    pub imdb_votes: f64,
    pub metacritic_score: Option<f64>,
}

impl ContentRecord {
    pub fn new(
        title: impl Into<String>,
        genres: impl Into<String>,
        release_year: i32,
        imdb_score: f64,
        imdb_votes: f64,
    ) -> Self {
        Self {
            title: title.into(),
            genres: genres.into(),
            release_year,
            imdb_score,
            imdb_votes,
            metacritic_score: None,
        }
    }

    pub fn with_metacritic(mut self, score: f64) -> Self {
        self.metacritic_score = Some(score);
        self
    }

    /// Whether the record may enter the catalog.
    ///
    /// Requires a non-empty title and genre, a finite IMDb score and a
    /// strictly positive, finite vote count.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.genres.trim().is_empty()
            && self.imdb_score.is_finite()
            && self.imdb_votes.is_finite()
            && self.imdb_votes > 0.0
    }
}

/// A catalog record together with its derived metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub record: ContentRecord,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

/// Row counts from building the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Immutable catalog shared by reference with every query
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    report: LoadReport,
}

impl Catalog {
    /// Load and clean a CSV catalog from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading catalog");
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load and clean a CSV catalog from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows = loader::read(reader)?;
        let mut catalog = Self::from_records(rows.records)?;

        catalog.report.rows_read = rows.rows_read;
        catalog.report.dropped = rows.rows_read - catalog.report.kept;

        info!(
            rows = catalog.report.rows_read,
            kept = catalog.report.kept,
            dropped = catalog.report.dropped,
            "catalog ready"
        );
        Ok(catalog)
    }

    /// Build a catalog from already-typed records.
    ///
    /// Incomplete records are excluded, then metrics are derived once over
    /// what remains. Fails with [`Error::EmptyCatalog`] when nothing is left.
    pub fn from_records(records: Vec<ContentRecord>) -> Result<Self> {
        let rows_read = records.len();
        let records: Vec<ContentRecord> = records.into_iter().filter(ContentRecord::is_complete).collect();

        if records.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        if records.len() < rows_read {
            debug!(excluded = rows_read - records.len(), "excluded incomplete records");
        }

        let metrics = metrics::derive(&records)?;
        let entries: Vec<CatalogEntry> = records
            .into_iter()
            .zip(metrics)
            .map(|(record, metrics)| CatalogEntry { record, metrics })
            .collect();

        let kept = entries.len();
        Ok(Self {
            entries,
            report: LoadReport {
                rows_read,
                kept,
                dropped: rows_read - kept,
            },
        })
    }

    /// Entries in source order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Distribution of one numeric column across the catalog
    pub fn column_stats<F>(&self, column: F) -> Option<ColumnStats>
    where
        F: Fn(&CatalogEntry) -> f64,
    {
        let values: Vec<f64> = self.entries.iter().map(column).collect();
        ColumnStats::from_values(&values)
    }
}
