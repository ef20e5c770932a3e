//! Plain-text result table

use crate::recommend::{RecommendationResult, ScoreColumn};
use std::io::{self, Write};

/// Format a score the way its column is usually read
pub fn format_score(column: ScoreColumn, value: f64) -> String {
    match column {
        ScoreColumn::HiddenGemScore => format!("{:.4}", value),
        ScoreColumn::Imdb => format!("{:.1}", value),
        ScoreColumn::Metacritic => format!("{:.0}", value),
    }
}

/// Write the `(Title, Release Year, score)` table, one row per selected title
pub fn write<W: Write>(writer: &mut W, result: &RecommendationResult) -> io::Result<()> {
    let column = result.score_column();
    let title_width = result
        .records()
        .iter()
        .map(|r| r.entry.record.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Title".len());
    let score_width = column.name().len().max(8);

    writeln!(
        writer,
        "{:>4}  {:<tw$}  {:>12}  {:>sw$}",
        "#",
        "Title",
        "Release Year",
        column.name(),
        tw = title_width,
        sw = score_width
    )?;

    for r in result.records() {
        writeln!(
            writer,
            "{:>4}  {:<tw$}  {:>12}  {:>sw$}",
            r.rank,
            r.entry.record.title,
            r.entry.record.release_year,
            format_score(column, r.score),
            tw = title_width,
            sw = score_width
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ContentRecord};
    use crate::recommend::{recommend, Mode, RecommendationQuery};

    #[test]
    fn test_format_score_per_column() {
        assert_eq!(format_score(ScoreColumn::HiddenGemScore, 3.141592), "3.1416");
        assert_eq!(format_score(ScoreColumn::Imdb, 7.85), "7.8");
        assert_eq!(format_score(ScoreColumn::Metacritic, 74.0), "74");
    }

    #[test]
    fn test_table_layout() {
        let catalog = Catalog::from_records(vec![
            ContentRecord::new("The Long Walk Home", "Drama", 1990, 7.0, 10.0).with_metacritic(81.0),
            ContentRecord::new("Up", "Drama", 2009, 8.2, 10.0).with_metacritic(88.0),
        ])
        .unwrap();
        let query = RecommendationQuery::new("Drama").with_mode(Mode::CriticsPick);
        let result = recommend(&catalog, &query).unwrap();

        let mut out = Vec::new();
        write(&mut out, &result).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Title"));
        assert!(lines[0].contains("Release Year"));
        assert!(lines[0].ends_with("Metacritic"));
        assert!(lines[1].contains("Up"));
        assert!(lines[1].contains("2009"));
        assert!(lines[1].ends_with("88"));
        assert!(lines[2].contains("The Long Walk Home"));
        // Columns line up
        assert_eq!(lines[1].len(), lines[2].len());
    }
}
