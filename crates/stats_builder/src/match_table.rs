//! Match table CSV I/O
//!
//! Reads the match export (one row per match, one XML blob column per
//! stat) and writes the per-match feature table.
//!
//! ## Input columns
//! - `match_api_id`, `home_team_api_id`, `away_team_api_id` (required)
//! - one column per requested stat kind (`card`, `possession`, `shoton`, ...)
//! - `average_home_odds`, `average_draw_odds`, `average_away_odds` (optional)

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use of_stats::{BatchReport, MatchAggregate, MatchOdds, MatchRecord, MatchTeams, StatCell, StatKind};

pub const MATCH_ID_COLUMN: &str = "match_api_id";
pub const HOME_TEAM_COLUMN: &str = "home_team_api_id";
pub const AWAY_TEAM_COLUMN: &str = "away_team_api_id";
pub const ODDS_COLUMNS: [&str; 3] = ["average_home_odds", "average_draw_odds", "average_away_odds"];
pub const OUTCOME_COLUMN: &str = "expected_outcome";

/// Parsed match table.
#[derive(Debug, Clone)]
pub struct MatchTable {
    pub records: Vec<MatchRecord>,
    /// Whether all three odds columns were present
    pub has_odds: bool,
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn required_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    column(headers, name).with_context(|| format!("Missing required column: {}", name))
}

fn parse_id(record: &csv::StringRecord, idx: usize, name: &str, line: u64) -> Result<i64> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<i64>()
        .with_context(|| format!("Line {} - Invalid {} value: '{}'", line, name, raw))
}

fn parse_odds(record: &csv::StringRecord, indices: &[usize; 3]) -> Option<MatchOdds> {
    let mut values = [0.0f64; 3];
    for (slot, &idx) in values.iter_mut().zip(indices) {
        *slot = record.get(idx)?.trim().parse::<f64>().ok()?;
    }
    Some(MatchOdds {
        home_win: values[0],
        draw: values[1],
        away_win: values[2],
    })
}

/// Read the match table, keeping the blob columns of `kinds`.
pub fn read_match_table(csv_path: &Path, kinds: &[StatKind]) -> Result<MatchTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let id_idx = required_column(&headers, MATCH_ID_COLUMN)?;
    let home_idx = required_column(&headers, HOME_TEAM_COLUMN)?;
    let away_idx = required_column(&headers, AWAY_TEAM_COLUMN)?;

    let mut stat_columns = Vec::with_capacity(kinds.len());
    for kind in kinds {
        match column(&headers, kind.name()) {
            Some(idx) => stat_columns.push((kind.name().to_string(), idx)),
            None => bail!("Missing column for requested stat: {}", kind),
        }
    }

    let odds_idx = match (
        column(&headers, ODDS_COLUMNS[0]),
        column(&headers, ODDS_COLUMNS[1]),
        column(&headers, ODDS_COLUMNS[2]),
    ) {
        (Some(h), Some(d), Some(a)) => Some([h, d, a]),
        _ => None,
    };

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        // Line 1 is the header
        let line = row as u64 + 2;
        let record = result.with_context(|| format!("Failed to read CSV line {}", line))?;

        let match_id = parse_id(&record, id_idx, MATCH_ID_COLUMN, line)?;
        let home = parse_id(&record, home_idx, HOME_TEAM_COLUMN, line)?;
        let away = parse_id(&record, away_idx, AWAY_TEAM_COLUMN, line)?;

        let blobs: HashMap<String, String> = stat_columns
            .iter()
            .filter_map(|(name, idx)| {
                let cell = record.get(*idx)?;
                if cell.trim().is_empty() {
                    None
                } else {
                    Some((name.clone(), cell.to_string()))
                }
            })
            .collect();

        records.push(MatchRecord {
            match_id,
            teams: MatchTeams::new(home, away),
            blobs,
            odds: odds_idx.as_ref().and_then(|idx| parse_odds(&record, idx)),
        });
    }

    Ok(MatchTable {
        records,
        has_odds: odds_idx.is_some(),
    })
}

/// Feature columns contributed by one stat kind.
pub fn feature_columns(kind: &StatKind) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for side in ["home", "away"] {
        for key in kind.total_keys() {
            columns.push(format!("{}_{}", side, key));
        }
    }
    columns.push(format!("unattributed_{}", kind.name()));
    columns
}

/// Full header of the feature table.
pub fn feature_header(kinds: &[StatKind], with_outcome: bool) -> Vec<String> {
    let mut header = vec![
        MATCH_ID_COLUMN.to_string(),
        HOME_TEAM_COLUMN.to_string(),
        AWAY_TEAM_COLUMN.to_string(),
    ];
    for kind in kinds {
        header.extend(feature_columns(kind));
    }
    if with_outcome {
        header.push(OUTCOME_COLUMN.to_string());
    }
    header
}

fn cell_values(kind: &StatKind, agg: Option<&MatchAggregate>) -> Vec<String> {
    let keys = kind.total_keys();
    let Some(agg) = agg else {
        return vec![String::new(); keys.len() * 2 + 1];
    };

    let mut values = Vec::with_capacity(keys.len() * 2 + 1);
    for totals in [&agg.home, &agg.away] {
        for key in &keys {
            values.push(totals.get(key).to_string());
        }
    }
    values.push(agg.unattributed.to_string());
    values
}

/// Write the feature table for `report`.
pub fn write_feature_table(
    out_path: &Path,
    kinds: &[StatKind],
    report: &BatchReport,
    with_outcome: bool,
) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(out_path)
        .with_context(|| format!("Failed to create output file: {}", out_path.display()))?;
    writer.write_record(feature_header(kinds, with_outcome))?;

    for row in &report.rows {
        let mut fields = vec![
            row.match_id.to_string(),
            row.home_team_id.to_string(),
            row.away_team_id.to_string(),
        ];
        for (kind, cell) in kinds.iter().zip(&row.cells) {
            fields.extend(cell_values(kind, cell.aggregate()));
        }
        if with_outcome {
            fields.push(
                row.expected_outcome
                    .map(|o| o.as_str().to_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&fields)?;
    }

    writer.flush().context("Failed to flush feature table")?;
    Ok(())
}

/// Count of cells per status, for summaries.
pub fn cell_summary(report: &BatchReport) -> (usize, usize, usize) {
    let mut aggregated = 0;
    let mut missing = 0;
    let mut failed = 0;
    for cell in report.rows.iter().flat_map(|r| r.cells.iter()) {
        match cell {
            StatCell::Aggregated(_) => aggregated += 1,
            StatCell::Missing => missing += 1,
            StatCell::Failed { .. } => failed += 1,
        }
    }
    (aggregated, missing, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_columns_per_kind() {
        assert_eq!(
            feature_columns(&StatKind::Card),
            vec![
                "home_yellow_card",
                "home_red_card",
                "away_yellow_card",
                "away_red_card",
                "unattributed_card"
            ]
        );
        assert_eq!(
            feature_columns(&StatKind::Possession),
            vec!["home_possession", "away_possession", "unattributed_possession"]
        );
        assert_eq!(
            feature_columns(&StatKind::parse("corner")),
            vec!["home_corner", "away_corner", "unattributed_corner"]
        );
    }

    #[test]
    fn test_header_with_outcome() {
        let header = feature_header(&[StatKind::parse("goal")], true);
        assert_eq!(header.first().map(String::as_str), Some(MATCH_ID_COLUMN));
        assert_eq!(header.last().map(String::as_str), Some(OUTCOME_COLUMN));
        assert_eq!(header.len(), 3 + 3 + 1);
    }

    #[test]
    fn test_blank_cells_for_missing_aggregate() {
        let values = cell_values(&StatKind::Card, None);
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(String::is_empty));
    }
}
