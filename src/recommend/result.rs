//! The packaged outcome of a recommendation request

use super::rank::Ranked;
use super::{Mode, ScoreColumn};
use crate::catalog::CatalogEntry;
use serde::Serialize;

/// A selected title with its position and ranking score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedTitle {
    /// 1-based position in the recommendation
    pub rank: usize,
    /// Value in the mode's score column
    pub score: f64,
    #[serde(flatten)]
    pub entry: CatalogEntry,
}

/// Read-only result handed to exporters and renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    mode: Mode,
    label: &'static str,
    score_column: ScoreColumn,
    records: Vec<RecommendedTitle>,
    /// Score-column values of every title that passed the mode filter,
    /// before truncation, in catalog order
    candidate_scores: Vec<f64>,
}

impl RecommendationResult {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn score_column(&self) -> ScoreColumn {
        self.score_column
    }

    /// Selected titles, best first
    pub fn records(&self) -> &[RecommendedTitle] {
        &self.records
    }

    pub fn candidate_scores(&self) -> &[f64] {
        &self.candidate_scores
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Bundle a ranked selection. Pure; performs no I/O.
pub fn package(mode: Mode, top: Vec<Ranked<'_>>, candidate_scores: Vec<f64>) -> RecommendationResult {
    let records = top
        .into_iter()
        .enumerate()
        .map(|(i, ranked)| RecommendedTitle {
            rank: i + 1,
            score: ranked.score,
            entry: ranked.entry.clone(),
        })
        .collect();

    RecommendationResult {
        mode,
        label: mode.label(),
        score_column: mode.score_column(),
        records,
        candidate_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ContentRecord, DerivedMetrics};

    fn entry(title: &str) -> CatalogEntry {
        CatalogEntry {
            record: ContentRecord::new(title, "Drama", 2000, 8.0, 100.0).with_metacritic(81.0),
            metrics: DerivedMetrics::default(),
        }
    }

    #[test]
    fn test_package_labels_each_mode() {
        let expected = [
            (Mode::HiddenGem, "Hidden Gem", "Hidden Gem Score"),
            (Mode::Popular, "Popular", "IMDb"),
            (Mode::CriticsPick, "Critic's Pick", "Metacritic"),
        ];
        for (mode, label, column) in expected {
            let result = package(mode, vec![], vec![]);
            assert_eq!(result.mode(), mode);
            assert_eq!(result.label(), label);
            assert_eq!(result.score_column().name(), column);
        }
    }

    #[test]
    fn test_package_assigns_ranks_in_order() {
        let a = entry("A");
        let b = entry("B");
        let top = vec![Ranked { entry: &a, score: 90.0 }, Ranked { entry: &b, score: 85.0 }];
        let result = package(Mode::CriticsPick, top, vec![90.0, 85.0, 71.0]);

        assert_eq!(result.len(), 2);
        assert_eq!(result.records()[0].rank, 1);
        assert_eq!(result.records()[0].entry.record.title, "A");
        assert_eq!(result.records()[1].rank, 2);
        assert_eq!(result.records()[1].score, 85.0);
        assert_eq!(result.candidate_scores(), &[90.0, 85.0, 71.0]);
    }

    #[test]
    fn test_result_serializes_flat_titles() {
        let a = entry("A");
        let result = package(Mode::Popular, vec![Ranked { entry: &a, score: 8.0 }], vec![8.0]);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["label"], "Popular");
        assert_eq!(json["score_column"], "IMDb");
        assert_eq!(json["records"][0]["title"], "A");
        assert_eq!(json["records"][0]["rank"], 1);
        assert_eq!(json["records"][0]["release_year"], 2000);
        assert!(json["records"][0].get("hidden_gem_score").is_some());
    }
}
