//! JSON result dump

use super::Summary;
use crate::error::Result;
use crate::recommend::{RecommendationQuery, RecommendationResult};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ExportDocument<'a> {
    generated: String,
    query: &'a RecommendationQuery,
    summary: Summary,
    result: &'a RecommendationResult,
}

pub fn write<W: Write>(writer: W, query: &RecommendationQuery, result: &RecommendationResult) -> Result<()> {
    let doc = ExportDocument {
        generated: chrono::Local::now().to_rfc3339(),
        query,
        summary: Summary::from_result(result),
        result,
    };
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}
