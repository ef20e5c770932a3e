//! reelpick - Recommend titles from a streaming catalog
//!
//! reelpick loads a catalog export (title, genres, release date, IMDb score,
//! IMDb votes, Metacritic score), derives a few popularity and quality
//! metrics once, and answers queries of the form "best *genre* titles between
//! *these years* under *this mode*".
//!
//! # Modes
//!
//! 1. **Hidden Gem**: ranks by `imdb_score / imdb_votes^0.1`, which keeps a
//!    strong rating worth more than a large audience.
//!
//! 2. **Popular**: ranks by IMDb score, requiring at least 7.5 and 5,000 votes.
//!
//! 3. **Critic's Pick**: ranks by Metacritic score, requiring at least 70.
//!
//! Hidden Gem and Popular also drop statistical outliers: titles whose
//! z-score on the ranking metric is 2 or more away from the catalog mean.
//!
//! # Quick Start
//!
//! ```no_run
//! use reelpick::{recommend, Catalog, Mode, RecommendationQuery};
//!
//! let catalog = Catalog::load("netflix-titles.csv")?;
//! let query = RecommendationQuery::new("Drama")
//!     .with_years(Some(2000), Some(2024))
//!     .with_mode(Mode::HiddenGem);
//!
//! match recommend(&catalog, &query) {
//!     Ok(result) => {
//!         for title in result.records() {
//!             println!("{}. {} ({:.3})", title.rank, title.entry.record.title, title.score);
//!         }
//!     }
//!     Err(reelpick::Error::NoResults) => println!("Nothing matched"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), reelpick::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: CSV loading, cleaning and metric derivation
//! - [`recommend`]: filter, rank and package a query
//! - [`report`]: text, JSON and chart exports
//! - [`serve`]: local web form

pub mod catalog;
pub mod error;
pub mod recommend;
pub mod report;
pub mod serve;

pub use catalog::{Catalog, CatalogEntry, ContentRecord, DerivedMetrics, LoadReport};
pub use error::{Error, Result};
pub use recommend::{
    recommend, Mode, RecommendationQuery, RecommendationResult, RecommendedTitle, ScoreColumn, GENRES, TOP_N,
};
