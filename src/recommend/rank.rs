//! Ranking and top-N selection

use super::ScoreColumn;
use crate::catalog::CatalogEntry;
use crate::error::{Error, Result};

/// Number of titles in a recommendation
pub const TOP_N: usize = 10;

/// A candidate with its value in the ranking column
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub entry: &'a CatalogEntry,
    pub score: f64,
}

/// Sort candidates by `column`, highest first.
///
/// The sort is stable, so equal scores keep catalog order. Candidates without
/// a value in the column are left out.
pub fn rank<'a>(candidates: &[&'a CatalogEntry], column: ScoreColumn) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = candidates
        .iter()
        .filter_map(|&entry| column.value(entry).map(|score| Ranked { entry, score }))
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// The `n` best candidates, or [`Error::NoResults`] if there are none
pub fn top_n<'a>(candidates: &[&'a CatalogEntry], column: ScoreColumn, n: usize) -> Result<Vec<Ranked<'a>>> {
    let mut ranked = rank(candidates, column);
    if ranked.is_empty() {
        return Err(Error::NoResults);
    }
    ranked.truncate(n);
    Ok(ranked)
}
