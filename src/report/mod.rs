//! Result export
//!
//! Every successful recommendation is written into a fresh run directory
//! (`<output dir>/<yyMMddHHmmss>`):
//!
//! | File | Contents |
//! |------|----------|
//! | `recommendation_result.txt` | Title / year / score table |
//! | `recommendation_result.json` | Query, summary and full result |
//! | `barplot.html` | Top 10 by score |
//! | `audience_vs_critic.html` | IMDb vs Metacritic, top 10 (only if any has a Metacritic score) |
//! | `score_distribution.html` | Histogram of the score column over every candidate |
//! | `votes_vs_score.html` | IMDb votes vs score, top 10 |
//! | `title_wordcloud.html` | Title frequency cloud of the top 10 |
//!
//! Charts are standalone HTML pages rendered with D3.js; all chart data is
//! computed here and embedded as JSON.
//!
//! # Usage
//!
//! ```ignore
//! use reelpick::report;
//!
//! let dir = report::create_run_directory("image")?;
//! let artifacts = report::export(&dir, &query, &result)?;
//! ```

pub mod charts;
pub mod html;
pub mod json;
pub mod text;

use crate::error::Result;
use crate::recommend::{RecommendationQuery, RecommendationResult};
use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub use text::format_score;

pub const TEXT_FILE: &str = "recommendation_result.txt";
pub const JSON_FILE: &str = "recommendation_result.json";
pub const BARPLOT_FILE: &str = "barplot.html";
pub const AUDIENCE_VS_CRITIC_FILE: &str = "audience_vs_critic.html";
pub const SCORE_DISTRIBUTION_FILE: &str = "score_distribution.html";
pub const VOTES_VS_SCORE_FILE: &str = "votes_vs_score.html";
pub const WORDCLOUD_FILE: &str = "title_wordcloud.html";

/// Layout of run directory names
const RUN_STAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Create a fresh run directory under `base`, named after the current time
pub fn create_run_directory<P: AsRef<Path>>(base: P) -> io::Result<PathBuf> {
    let stamp = Local::now().format(RUN_STAMP_FORMAT).to_string();
    create_run_directory_named(base.as_ref(), &stamp)
}

/// Create `base/stamp`, or `base/stamp-2`, `base/stamp-3`... if taken
pub fn create_run_directory_named(base: &Path, stamp: &str) -> io::Result<PathBuf> {
    std::fs::create_dir_all(base)?;

    let mut suffix = 1;
    loop {
        let name = if suffix == 1 {
            stamp.to_string()
        } else {
            format!("{}-{}", stamp, suffix)
        };
        let candidate = base.join(name);
        match std::fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Summary statistics for a recommendation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub selected: usize,
    pub candidates: usize,
    pub best_score: Option<f64>,
    pub lowest_selected_score: Option<f64>,
    pub candidate_mean: Option<f64>,
}

impl Summary {
    pub fn from_result(result: &RecommendationResult) -> Self {
        let scores = result.candidate_scores();
        let candidate_mean = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        Self {
            selected: result.len(),
            candidates: scores.len(),
            best_score: result.records().first().map(|r| r.score),
            lowest_selected_score: result.records().last().map(|r| r.score),
            candidate_mean,
        }
    }
}

/// Files written for one recommendation
#[derive(Debug, Clone, Serialize)]
pub struct ExportedArtifacts {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Write every artifact for `result` into `dir`
pub fn export(dir: &Path, query: &RecommendationQuery, result: &RecommendationResult) -> Result<ExportedArtifacts> {
    let mut files = Vec::new();

    let path = dir.join(TEXT_FILE);
    write_file(&path, |w| text::write(w, result))?;
    files.push(path);

    let path = dir.join(JSON_FILE);
    let mut writer = BufWriter::new(File::create(&path)?);
    json::write(&mut writer, query, result)?;
    writer.flush()?;
    files.push(path);

    for (name, page) in charts::pages(result) {
        let path = dir.join(name);
        write_file(&path, |w| html::write(w, &page))?;
        files.push(path);
    }

    info!(
        directory = %dir.display(),
        files = files.len(),
        mode = result.mode().key(),
        "exported recommendation"
    );

    Ok(ExportedArtifacts {
        directory: dir.to_path_buf(),
        files,
    })
}

fn write_file<F>(path: &Path, body: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    body(&mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ContentRecord};
    use crate::recommend::{recommend, Mode};

    // ==========================================================================
    // SUMMARY STATISTICS TESTS
    // ==========================================================================
    //
    // The summary is embedded in the JSON dump and gives a quick read on how
    // selective the query was.
    // ==========================================================================

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            ContentRecord::new("Alpha", "Drama", 2001, 8.0, 12_000.0).with_metacritic(90.0),
            ContentRecord::new("Beta", "Drama", 2002, 7.6, 8_000.0),
            ContentRecord::new("Gamma", "Drama", 2003, 7.0, 900.0).with_metacritic(72.0),
            ContentRecord::new("Delta", "Comedy", 2004, 7.9, 20_000.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_summary_from_result() {
        let query = RecommendationQuery::new("Drama").with_mode(Mode::CriticsPick);
        let result = recommend(&catalog(), &query).unwrap();
        let summary = Summary::from_result(&result);

        assert_eq!(summary.selected, 2);
        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.best_score, Some(90.0));
        assert_eq!(summary.lowest_selected_score, Some(72.0));
        assert_eq!(summary.candidate_mean, Some(81.0));
    }

    #[test]
    fn test_summary_default() {
        let summary = Summary::default();
        assert_eq!(summary.selected, 0);
        assert_eq!(summary.best_score, None);
    }

    // ==========================================================================
    // RUN DIRECTORY TESTS
    // ==========================================================================

    #[test]
    fn test_run_directory_is_fresh() {
        let base = tempfile::tempdir().unwrap();
        let first = create_run_directory_named(base.path(), "260101120000").unwrap();
        let second = create_run_directory_named(base.path(), "260101120000").unwrap();
        let third = create_run_directory_named(base.path(), "260101120000").unwrap();

        assert!(first.ends_with("260101120000"));
        assert!(second.ends_with("260101120000-2"));
        assert!(third.ends_with("260101120000-3"));
        assert!(first.is_dir() && second.is_dir() && third.is_dir());
    }

    #[test]
    fn test_run_directory_creates_base() {
        let base = tempfile::tempdir().unwrap();
        let nested = base.path().join("image");
        let dir = create_run_directory(&nested).unwrap();
        assert!(dir.starts_with(&nested));
        assert_eq!(dir.file_name().unwrap().len(), 12);
    }

    // ==========================================================================
    // EXPORT TESTS
    // ==========================================================================

    fn names(artifacts: &ExportedArtifacts) -> Vec<String> {
        artifacts
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_export_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let query = RecommendationQuery::new("Drama").with_mode(Mode::CriticsPick);
        let result = recommend(&catalog(), &query).unwrap();

        let artifacts = export(dir.path(), &query, &result).unwrap();
        assert_eq!(
            names(&artifacts),
            vec![
                TEXT_FILE,
                JSON_FILE,
                BARPLOT_FILE,
                AUDIENCE_VS_CRITIC_FILE,
                SCORE_DISTRIBUTION_FILE,
                VOTES_VS_SCORE_FILE,
                WORDCLOUD_FILE,
            ]
        );
        for file in &artifacts.files {
            assert!(file.is_file(), "{} missing", file.display());
        }
    }

    #[test]
    fn test_export_skips_audience_chart_without_metacritic() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_records(vec![
            ContentRecord::new("Beta", "Drama", 2002, 7.6, 8_000.0),
            ContentRecord::new("Omega", "Drama", 2003, 7.8, 9_000.0),
        ])
        .unwrap();
        let query = RecommendationQuery::new("Drama").with_mode(Mode::Popular);
        let result = recommend(&catalog, &query).unwrap();

        let artifacts = export(dir.path(), &query, &result).unwrap();
        assert!(!names(&artifacts).contains(&AUDIENCE_VS_CRITIC_FILE.to_string()));
        assert!(!dir.path().join(AUDIENCE_VS_CRITIC_FILE).exists());
    }

    #[test]
    fn test_exported_text_lists_titles_in_rank_order() {
        let dir = tempfile::tempdir().unwrap();
        let query = RecommendationQuery::new("Drama").with_mode(Mode::CriticsPick);
        let result = recommend(&catalog(), &query).unwrap();
        export(dir.path(), &query, &result).unwrap();

        let text = std::fs::read_to_string(dir.path().join(TEXT_FILE)).unwrap();
        let alpha = text.find("Alpha").unwrap();
        let gamma = text.find("Gamma").unwrap();
        assert!(alpha < gamma);
        assert!(text.contains("Metacritic"));
    }
}
