//! Recommendation pipeline
//!
//! Every request runs the same three stages against the shared, immutable
//! [`Catalog`]:
//!
//! 1. [`filter`]: genre substring, year range, then the mode's inclusion rules
//! 2. [`rank`]: stable descending sort on the mode's score column, top 10
//! 3. [`result`]: package the selection with its score column and label
//!
//! # Modes
//!
//! | Mode | Score column | Inclusion |
//! |------|--------------|-----------|
//! | Hidden Gem | Hidden Gem Score | `|z_hidden_gem| < 2`, score >= 1.0 |
//! | Popular | IMDb | `|z_imdb| < 2`, IMDb >= 7.5, votes >= 5000 |
//! | Critic's Pick | Metacritic | Metacritic present and >= 70 |
//!
//! The z-score band is measured against the whole catalog, not the
//! genre/year subset, so the same title is an outlier for every query.
//! Critic's Pick deliberately skips the band: Metacritic coverage is sparse and
//! the absolute threshold is the intended bar.

pub mod filter;
pub mod rank;
pub mod result;

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub use rank::TOP_N;
pub use result::{RecommendationResult, RecommendedTitle};

/// Genre tags offered by the query form
pub const GENRES: [&str; 28] = [
    "Action",
    "Adult",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film-Noir",
    "Game-Show",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "News",
    "Reality-TV",
    "Romance",
    "Sci-Fi",
    "Short",
    "Sport",
    "Talk-Show",
    "Thriller",
    "War",
    "Western",
];

/// Ranking strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    HiddenGem,
    Popular,
    CriticsPick,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::HiddenGem, Mode::Popular, Mode::CriticsPick];

    /// Display label used in chart titles and messages
    pub fn label(self) -> &'static str {
        match self {
            Mode::HiddenGem => "Hidden Gem",
            Mode::Popular => "Popular",
            Mode::CriticsPick => "Critic's Pick",
        }
    }

    pub fn score_column(self) -> ScoreColumn {
        match self {
            Mode::HiddenGem => ScoreColumn::HiddenGemScore,
            Mode::Popular => ScoreColumn::Imdb,
            Mode::CriticsPick => ScoreColumn::Metacritic,
        }
    }

    /// Stable identifier, as accepted on the command line
    pub fn key(self) -> &'static str {
        match self {
            Mode::HiddenGem => "hidden-gem",
            Mode::Popular => "popular",
            Mode::CriticsPick => "critics-pick",
        }
    }

    /// Interpret a mode chosen in a form.
    ///
    /// Accepts keys (`hidden-gem`) and labels (`Hidden Gem`) in any case and
    /// punctuation. Anything else, including the form's "select a mode"
    /// placeholder, is `None`.
    pub fn parse_selection(raw: &str) -> Option<Mode> {
        let normalized: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "hiddengem" => Some(Mode::HiddenGem),
            "popular" => Some(Mode::Popular),
            "criticspick" | "criticpick" => Some(Mode::CriticsPick),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column a mode ranks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScoreColumn {
    #[serde(rename = "Hidden Gem Score")]
    HiddenGemScore,
    #[serde(rename = "IMDb")]
    Imdb,
    #[serde(rename = "Metacritic")]
    Metacritic,
}

impl ScoreColumn {
    pub fn name(self) -> &'static str {
        match self {
            ScoreColumn::HiddenGemScore => "Hidden Gem Score",
            ScoreColumn::Imdb => "IMDb",
            ScoreColumn::Metacritic => "Metacritic",
        }
    }

    /// Value of this column for an entry; `None` only for a missing Metacritic score
    pub fn value(self, entry: &CatalogEntry) -> Option<f64> {
        match self {
            ScoreColumn::HiddenGemScore => Some(entry.metrics.hidden_gem_score),
            ScoreColumn::Imdb => Some(entry.record.imdb_score),
            ScoreColumn::Metacritic => entry.record.metacritic_score,
        }
    }
}

impl fmt::Display for ScoreColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One recommendation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationQuery {
    /// Matched as a case-sensitive substring of the genre tags
    pub genre: String,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    /// `None` means no mode was selected
    pub mode: Option<Mode>,
}

impl RecommendationQuery {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            year_min: None,
            year_max: None,
            mode: None,
        }
    }

    pub fn with_years(mut self, year_min: Option<i32>, year_max: Option<i32>) -> Self {
        self.year_min = year_min;
        self.year_max = year_max;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Build a query from free-text form fields.
    ///
    /// Empty year fields mean "no bound". The genre must be one of [`GENRES`].
    /// An unrecognized mode is kept as "not selected" and reported when the
    /// query runs.
    pub fn from_form(genre: &str, year_min: &str, year_max: &str, mode: &str) -> Result<Self> {
        let genre = genre.trim();
        if !GENRES.contains(&genre) {
            return Err(Error::UnknownGenre(genre.to_string()));
        }
        Ok(Self {
            genre: genre.to_string(),
            year_min: parse_year_bound(year_min)?,
            year_max: parse_year_bound(year_max)?,
            mode: Mode::parse_selection(mode),
        })
    }
}

/// Parse a free-text year bound: empty is no bound, anything non-numeric is an error
pub fn parse_year_bound(raw: &str) -> Result<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| Error::InvalidYear(raw.to_string()))
}

/// Run a query against the catalog.
///
/// Fails with [`Error::ModeNotSelected`] before touching the catalog when the
/// query has no mode, and with [`Error::NoResults`] when nothing qualifies.
pub fn recommend(catalog: &Catalog, query: &RecommendationQuery) -> Result<RecommendationResult> {
    let mode = query.mode.ok_or(Error::ModeNotSelected)?;
    let column = mode.score_column();

    let candidates = filter::apply(catalog, query, mode);
    let candidate_scores: Vec<f64> = candidates.iter().filter_map(|e| column.value(e)).collect();
    let top = rank::top_n(&candidates, column, TOP_N)?;

    debug!(
        mode = mode.key(),
        genre = %query.genre,
        candidates = candidates.len(),
        selected = top.len(),
        "recommendation complete"
    );

    Ok(result::package(mode, top, candidate_scores))
}
