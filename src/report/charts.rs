//! Chart data for the HTML chart pages
//!
//! Everything the browser draws is computed here; the page script only maps
//! these values onto D3 scales.

use super::{
    AUDIENCE_VS_CRITIC_FILE, BARPLOT_FILE, SCORE_DISTRIBUTION_FILE, VOTES_VS_SCORE_FILE, WORDCLOUD_FILE,
};
use crate::catalog::ColumnStats;
use crate::recommend::RecommendationResult;
use serde::Serialize;
use std::f64::consts::PI;

pub const HISTOGRAM_BINS: usize = 20;

/// Evaluation points on the density curve
pub const DENSITY_POINTS: usize = 200;

/// Point labels are cut to this many characters
pub const LABEL_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarDatum {
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointDatum {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Half-open `[start, end)` bin; the last bin also includes its end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Point on a density curve, scaled to histogram counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

/// Histogram with a smoothed density overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDistribution {
    pub bins: Vec<HistogramBin>,
    pub density: Vec<DensityPoint>,
}

impl ScoreDistribution {
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = histogram(values, bins);
        let density = match bins.first() {
            Some(first) => density_curve(values, first.end - first.start, DENSITY_POINTS),
            None => vec![],
        };
        Self { bins, density }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordWeight {
    pub text: String,
    pub weight: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Bars(Vec<BarDatum>),
    Points(Vec<PointDatum>),
    Distribution(ScoreDistribution),
    Words(Vec<WordWeight>),
}

impl ChartData {
    /// Name of the drawing routine in the page script
    pub fn kind(&self) -> &'static str {
        match self {
            ChartData::Bars(_) => "bar",
            ChartData::Points(_) => "scatter",
            ChartData::Distribution(_) => "histogram",
            ChartData::Words(_) => "wordcloud",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Bars(v) => v.is_empty(),
            ChartData::Points(v) => v.is_empty(),
            ChartData::Distribution(d) => d.bins.is_empty(),
            ChartData::Words(v) => v.is_empty(),
        }
    }
}

/// One chart page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPage {
    pub kind: &'static str,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl ChartPage {
    fn new(title: String, x_label: &str, y_label: &str, data: ChartData) -> Self {
        Self {
            kind: data.kind(),
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            data,
        }
    }
}

/// Chart pages for a result, keyed by file name.
///
/// The audience-vs-critic page is left out when none of the selected titles
/// has a Metacritic score.
pub fn pages(result: &RecommendationResult) -> Vec<(&'static str, ChartPage)> {
    let column = result.score_column().name();
    let label = result.label();
    let mut pages = Vec::with_capacity(5);

    pages.push((
        BARPLOT_FILE,
        ChartPage::new(
            format!("Top 10 Recommendations - {}", label),
            column,
            "Title",
            ChartData::Bars(bars(result)),
        ),
    ));

    let critic = audience_vs_critic(result);
    if !critic.is_empty() {
        pages.push((
            AUDIENCE_VS_CRITIC_FILE,
            ChartPage::new(
                "Audience vs Critic: IMDb vs Metacritic".to_string(),
                "IMDb",
                "Metacritic",
                ChartData::Points(critic),
            ),
        ));
    }

    pages.push((
        SCORE_DISTRIBUTION_FILE,
        ChartPage::new(
            format!("{} Distribution - {}", column, label),
            column,
            "Count",
            ChartData::Distribution(ScoreDistribution::new(result.candidate_scores(), HISTOGRAM_BINS)),
        ),
    ));

    pages.push((
        VOTES_VS_SCORE_FILE,
        ChartPage::new(
            format!("Votes vs {} ({})", column, label),
            "IMDb Votes",
            column,
            ChartData::Points(votes_vs_score(result)),
        ),
    ));

    pages.push((
        WORDCLOUD_FILE,
        ChartPage::new(
            format!("Top Titles - {}", label),
            "",
            "",
            ChartData::Words(title_frequencies(result)),
        ),
    ));

    pages
}

pub fn bars(result: &RecommendationResult) -> Vec<BarDatum> {
    result
        .records()
        .iter()
        .map(|r| BarDatum {
            title: r.entry.record.title.clone(),
            score: r.score,
        })
        .collect()
}

/// IMDb (x) against Metacritic (y) for selected titles that have both
pub fn audience_vs_critic(result: &RecommendationResult) -> Vec<PointDatum> {
    result
        .records()
        .iter()
        .filter_map(|r| {
            r.entry.record.metacritic_score.map(|meta| PointDatum {
                x: r.entry.record.imdb_score,
                y: meta,
                label: short_label(&r.entry.record.title),
            })
        })
        .collect()
}

/// IMDb votes (x) against the ranking score (y)
pub fn votes_vs_score(result: &RecommendationResult) -> Vec<PointDatum> {
    result
        .records()
        .iter()
        .map(|r| PointDatum {
            x: r.entry.record.imdb_votes,
            y: r.score,
            label: short_label(&r.entry.record.title),
        })
        .collect()
}

/// Equal-width histogram over `[min, max]`.
///
/// A column with a single distinct value gets the range `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return vec![];
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate over `[min, max]`, scaled so it sits on
/// a count histogram with bins of `bin_width`.
///
/// Bandwidth follows Scott's rule on the sample standard deviation
/// (`h = s * n^(-1/5)`). Fewer than two values, or no spread, gives no curve.
pub fn density_curve(values: &[f64], bin_width: f64, points: usize) -> Vec<DensityPoint> {
    let n = values.len();
    if n < 2 || points < 2 {
        return vec![];
    }
    let stats = match ColumnStats::from_values(values) {
        Some(s) if s.max > s.min && s.std_dev > 0.0 => s,
        _ => return vec![],
    };

    let sample_std = stats.std_dev * (n as f64 / (n - 1) as f64).sqrt();
    let bandwidth = sample_std * (n as f64).powf(-0.2);
    // Density integrates to 1; counts integrate to n * bin_width
    let scale = bin_width / (bandwidth * (2.0 * PI).sqrt());
    let step = (stats.max - stats.min) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = if i + 1 == points { stats.max } else { stats.min + step * i as f64 };
            let y = values
                .iter()
                .map(|&v| {
                    let u = (x - v) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                * scale;
            DensityPoint { x, y }
        })
        .collect()
}

/// How often each selected title occurs, most frequent first
pub fn title_frequencies(result: &RecommendationResult) -> Vec<WordWeight> {
    let mut weights: Vec<WordWeight> = Vec::new();
    for r in result.records() {
        let title = &r.entry.record.title;
        match weights.iter_mut().find(|w| &w.text == title) {
            Some(w) => w.weight += 1,
            None => weights.push(WordWeight {
                text: title.clone(),
                weight: 1,
            }),
        }
    }
    weights.sort_by(|a, b| b.weight.cmp(&a.weight));
    weights
}

/// First [`LABEL_CHARS`] characters of a title
pub fn short_label(title: &str) -> String {
    title.chars().take(LABEL_CHARS).collect()
}
