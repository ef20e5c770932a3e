//! Derived per-title metrics
//!
//! # Hidden Gem Score
//!
//! ```text
//! hidden_gem_score = imdb_score / imdb_votes ^ 0.1
//! ```
//!
//! The tenth root grows very slowly, so vote counts *discount* a rating rather
//! than punish it: a 8.0 with 100 votes scores ~5.05, the same 8.0 with a
//! million votes scores ~2.02. Well-rated but rarely seen titles float up.
//!
//! # Population z-scores
//!
//! `z = (x - mean) / std_dev`, with mean and standard deviation taken over the
//! whole catalog (divide by `n`, not `n - 1`). A column with no spread (a
//! single-title catalog, or identical values) has every z-score at 0.

use super::ContentRecord;
use crate::error::{Error, Result};
use serde::Serialize;

/// Exponent applied to the vote count in the Hidden Gem Score
pub const VOTE_EXPONENT: f64 = 0.1;

/// Metrics computed once per catalog entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub hidden_gem_score: f64,
    pub z_hidden_gem: f64,
    pub z_imdb: f64,
    pub z_votes: f64,
}

/// Hidden Gem Score for a rating and vote count.
///
/// Returns `None` when the vote count is not strictly positive or the result
/// is not finite.
pub fn hidden_gem_score(imdb_score: f64, imdb_votes: f64) -> Option<f64> {
    if imdb_votes.is_nan() || imdb_votes <= 0.0 {
        return None;
    }
    let score = imdb_score / imdb_votes.powf(VOTE_EXPONENT);
    score.is_finite().then_some(score)
}

/// Mean, population standard deviation and range of a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    /// `None` for an empty column
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }

    /// Population z-score of `x` against this column
    pub fn z(&self, x: f64) -> f64 {
        if self.has_spread() {
            (x - self.mean) / self.std_dev
        } else {
            0.0
        }
    }

    // Decided on the exact range; the summed mean drifts on long constant columns.
    fn has_spread(&self) -> bool {
        self.max > self.min && self.std_dev > 0.0
    }
}

/// Population z-scores for a whole column
pub fn zscores(values: &[f64]) -> Result<Vec<f64>> {
    let stats = ColumnStats::from_values(values).ok_or(Error::EmptyCatalog)?;
    Ok(values.iter().map(|&x| stats.z(x)).collect())
}

/// Derive metrics for every record, in order.
///
/// Records must already satisfy [`ContentRecord::is_complete`]; anything
/// without a defined Hidden Gem Score is rejected as an empty catalog would be.
pub(crate) fn derive(records: &[ContentRecord]) -> Result<Vec<DerivedMetrics>> {
    let gems: Vec<f64> = records
        .iter()
        .map(|r| hidden_gem_score(r.imdb_score, r.imdb_votes))
        .collect::<Option<_>>()
        .ok_or(Error::EmptyCatalog)?;
    let imdb: Vec<f64> = records.iter().map(|r| r.imdb_score).collect();
    let votes: Vec<f64> = records.iter().map(|r| r.imdb_votes).collect();

    let z_gem = zscores(&gems)?;
    let z_imdb = zscores(&imdb)?;
    let z_votes = zscores(&votes)?;

    Ok((0..records.len())
        .map(|i| DerivedMetrics {
            hidden_gem_score: gems[i],
            z_hidden_gem: z_gem[i],
            z_imdb: z_imdb[i],
            z_votes: z_votes[i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // HIDDEN GEM SCORE TESTS
    // ==========================================================================

    #[test]
    fn test_hidden_gem_single_vote_is_raw_score() {
        // 1^0.1 == 1
        assert_eq!(hidden_gem_score(8.0, 1.0), Some(8.0));
    }

    #[test]
    fn test_hidden_gem_discounts_votes() {
        let few = hidden_gem_score(8.0, 100.0).unwrap();
        let many = hidden_gem_score(8.0, 1_000_000.0).unwrap();
        assert!((few - 8.0 / 100f64.powf(0.1)).abs() < 1e-12);
        assert!((many - 8.0 / 1_000_000f64.powf(0.1)).abs() < 1e-12);
        assert!(few > many);
    }

    #[test]
    fn test_hidden_gem_undefined_without_votes() {
        assert_eq!(hidden_gem_score(8.0, 0.0), None);
        assert_eq!(hidden_gem_score(8.0, -5.0), None);
        assert_eq!(hidden_gem_score(8.0, f64::NAN), None);
    }

    // ==========================================================================
    // Z-SCORE TESTS
    // ==========================================================================
    //
    // Population z-scores over a column should have mean ~0 and standard
    // deviation ~1. Degenerate columns (one value, or all values equal) map
    // to 0 rather than NaN.
    // ==========================================================================

    fn assert_standardized(z: &[f64]) {
        let stats = ColumnStats::from_values(z).unwrap();
        assert!(stats.mean.abs() < 1e-9, "mean should be ~0, got {}", stats.mean);
        assert!((stats.std_dev - 1.0).abs() < 1e-9, "std should be ~1, got {}", stats.std_dev);
    }

    #[test]
    fn test_zscores_are_standardized() {
        assert_standardized(&zscores(&[1.0, 2.0, 3.0, 4.0, 10.0]).unwrap());
        assert_standardized(&zscores(&[5_000.0, 120.0, 2_000_000.0, 33.0]).unwrap());
    }

    #[test]
    fn test_zscores_known_values() {
        // mean 2, population std sqrt(2/3)
        let z = zscores(&[1.0, 2.0, 3.0]).unwrap();
        let s = (2.0f64 / 3.0).sqrt();
        assert!((z[0] + 1.0 / s).abs() < 1e-12);
        assert!(z[1].abs() < 1e-12);
        assert!((z[2] - 1.0 / s).abs() < 1e-12);
    }

    #[test]
    fn test_zscores_single_value_is_zero() {
        assert_eq!(zscores(&[7.3]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_zscores_constant_column_is_zero() {
        let z = zscores(&[0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]).unwrap();
        assert!(z.iter().all(|&v| v == 0.0), "got {:?}", z);
    }

    #[test]
    fn test_zscores_large_constant_column_is_zero() {
        let z = zscores(&vec![7.3; 10_000]).unwrap();
        assert!(z.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_derive_constant_ratings_across_large_catalog() {
        let records: Vec<ContentRecord> = (0..10_000)
            .map(|i| ContentRecord::new(format!("T{}", i), "Drama", 2000, 7.3, 1_000.0 + i as f64))
            .collect();
        let metrics = derive(&records).unwrap();
        assert!(metrics.iter().all(|m| m.z_imdb == 0.0));
        assert!(metrics.iter().any(|m| m.z_votes != 0.0));
    }

    #[test]
    fn test_zscores_empty_is_error() {
        assert!(matches!(zscores(&[]), Err(Error::EmptyCatalog)));
    }

    #[test]
    fn test_column_stats_empty() {
        assert!(ColumnStats::from_values(&[]).is_none());
    }

    // ==========================================================================
    // DERIVATION TESTS
    // ==========================================================================

    #[test]
    fn test_derive_fills_every_metric() {
        let records = vec![
            ContentRecord::new("A", "Drama", 2001, 6.5, 1_000.0),
            ContentRecord::new("B", "Drama", 2002, 8.1, 50_000.0),
            ContentRecord::new("C", "Comedy", 2003, 7.2, 300.0),
        ];
        let metrics = derive(&records).unwrap();
        assert_eq!(metrics.len(), 3);

        let gem: Vec<f64> = metrics.iter().map(|m| m.hidden_gem_score).collect();
        assert!((gem[0] - 6.5 / 1_000f64.powf(0.1)).abs() < 1e-12);
        assert_standardized(&metrics.iter().map(|m| m.z_hidden_gem).collect::<Vec<_>>());
        assert_standardized(&metrics.iter().map(|m| m.z_imdb).collect::<Vec<_>>());
        assert_standardized(&metrics.iter().map(|m| m.z_votes).collect::<Vec<_>>());
    }

    #[test]
    fn test_derive_rejects_zero_votes() {
        let records = vec![ContentRecord::new("A", "Drama", 2001, 6.5, 0.0)];
        assert!(derive(&records).is_err());
    }
}
