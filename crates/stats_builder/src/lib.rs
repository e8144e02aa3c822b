//! Stats Builder Library
//!
//! Match table CSV → per-match event aggregation → feature table CSV,
//! with an optional metadata sidecar (SHA256 of the written table).

pub mod match_table;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use of_stats::{aggregate_match, AggregationConfig, MatchAggregate, MatchTeams, StatKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

pub use match_table::{
    feature_columns, feature_header, read_match_table, write_feature_table, MatchTable,
};

/// Feature table schema version
pub const FEATURE_SCHEMA_VERSION: &str = "v1";

/// Metadata of one feature table build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildMetadata {
    pub schema_version: String,
    /// SHA256 of the output file (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
    pub stats: Vec<String>,
    pub matches: usize,
    pub failed_matches: usize,
    pub unattributed_events: u64,
}

/// Stat kinds to build: the explicit request, or the configured defaults.
pub fn resolve_kinds(requested: &[String], config: &AggregationConfig) -> Vec<StatKind> {
    let names = if requested.is_empty() {
        config.stats.as_slice()
    } else {
        requested
    };
    names.iter().map(|n| StatKind::parse(n.trim())).collect()
}

/// Build the feature table for `input_csv` into `output_csv`.
///
/// # Arguments
///
/// * `input_csv` - Match table with one blob column per stat
/// * `output_csv` - Feature table path (parent directories are created)
/// * `kinds` - Stat kinds to aggregate, in output column order
/// * `config` - Aggregation settings
pub fn build_feature_table(
    input_csv: &Path,
    output_csv: &Path,
    kinds: &[StatKind],
    config: &AggregationConfig,
) -> Result<BuildMetadata> {
    let table = read_match_table(input_csv, kinds)?;
    info!(matches = table.records.len(), path = %input_csv.display(), "match table loaded");

    let report = of_stats::build_feature_rows(&table.records, kinds, config);
    write_feature_table(output_csv, kinds, &report, table.has_odds)?;

    let (aggregated, missing, failed) = match_table::cell_summary(&report);
    info!(aggregated, missing, failed, path = %output_csv.display(), "feature table written");

    Ok(BuildMetadata {
        schema_version: FEATURE_SCHEMA_VERSION.to_string(),
        checksum: file_checksum(output_csv)?,
        created_at: chrono::Utc::now().to_rfc3339(),
        stats: kinds.iter().map(|k| k.name().to_string()).collect(),
        matches: report.rows.len(),
        failed_matches: report.failed_matches,
        unattributed_events: report.unattributed_events,
    })
}

/// Aggregate a single blob file.
pub fn inspect_blob(
    xml_path: &Path,
    teams: MatchTeams,
    kind: &StatKind,
    config: &AggregationConfig,
) -> Result<MatchAggregate> {
    let blob = fs::read_to_string(xml_path)
        .with_context(|| format!("Failed to read event file: {}", xml_path.display()))?;
    aggregate_match(&blob, teams, kind, config)
        .with_context(|| format!("Failed to aggregate {} events", kind))
}

/// SHA256 of a file as lowercase hex.
pub fn file_checksum(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn save_metadata(path: &Path, meta: &BuildMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(meta).context("Failed to serialize metadata")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write metadata file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const CARD_HOME_YELLOW: &str =
        "<card><value><team>10</team><card_type>y</card_type></value></card>";
    const POSSESSION_FT: &str = "<possession><value><elapsed>90</elapsed>\
        <homepos>58</homepos><awaypos>42</awaypos></value></possession>";

    fn write_csv(rows: &[Vec<&str>]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        {
            let mut writer = csv::Writer::from_writer(&mut file);
            for row in rows {
                writer.write_record(row).unwrap();
            }
            writer.flush().unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn read_output(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_build_feature_table() -> Result<()> {
        let input = write_csv(&[
            vec!["match_api_id", "home_team_api_id", "away_team_api_id", "card", "possession"],
            vec!["1", "10", "20", CARD_HOME_YELLOW, POSSESSION_FT],
            vec!["2", "10", "20", "", "<possession><value>"],
        ]);
        let out_dir = TempDir::new()?;
        let output = out_dir.path().join("features").join("matches.csv");

        let kinds = vec![StatKind::Card, StatKind::Possession];
        let config = AggregationConfig::default();
        let meta = build_feature_table(input.path(), &output, &kinds, &config)?;

        assert_eq!(meta.matches, 2);
        assert_eq!(meta.failed_matches, 1);
        assert_eq!(meta.stats, vec!["card", "possession"]);
        assert_eq!(meta.checksum, file_checksum(&output)?);

        let rows = read_output(&output);
        assert_eq!(
            rows[0],
            vec![
                "match_api_id",
                "home_team_api_id",
                "away_team_api_id",
                "home_yellow_card",
                "home_red_card",
                "away_yellow_card",
                "away_red_card",
                "unattributed_card",
                "home_possession",
                "away_possession",
                "unattributed_possession",
            ]
        );
        assert_eq!(
            rows[1],
            vec!["1", "10", "20", "1", "0", "0", "0", "0", "58", "42", "0"]
        );
        assert_eq!(
            rows[2],
            vec!["2", "10", "20", "", "", "", "", "", "", "", ""]
        );
        Ok(())
    }

    #[test]
    fn test_odds_columns_add_expected_outcome() -> Result<()> {
        let input = write_csv(&[
            vec![
                "match_api_id",
                "home_team_api_id",
                "away_team_api_id",
                "corner",
                "average_home_odds",
                "average_draw_odds",
                "average_away_odds",
            ],
            vec!["5", "1", "2", "<corner/>", "1.7", "3.6", "5.0"],
            vec!["6", "1", "2", "<corner/>", "", "3.6", "5.0"],
        ]);
        let output = NamedTempFile::new()?;

        let kinds = vec![StatKind::parse("corner")];
        build_feature_table(input.path(), output.path(), &kinds, &AggregationConfig::default())?;

        let rows = read_output(output.path());
        assert_eq!(rows[0].last().map(String::as_str), Some("expected_outcome"));
        assert_eq!(rows[1], vec!["5", "1", "2", "0", "0", "0", "home_win"]);
        assert_eq!(rows[2].last().map(String::as_str), Some(""));
        Ok(())
    }

    #[test]
    fn test_missing_stat_column_fails() {
        let input = write_csv(&[
            vec!["match_api_id", "home_team_api_id", "away_team_api_id"],
            vec!["1", "10", "20"],
        ]);
        let output = NamedTempFile::new().unwrap();
        let result = build_feature_table(
            input.path(),
            output.path(),
            &[StatKind::parse("shoton")],
            &AggregationConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_team_id_fails() {
        let input = write_csv(&[
            vec!["match_api_id", "home_team_api_id", "away_team_api_id", "goal"],
            vec!["1", "ten", "20", "<goal/>"],
        ]);
        let output = NamedTempFile::new().unwrap();
        let err = build_feature_table(
            input.path(),
            output.path(),
            &[StatKind::parse("goal")],
            &AggregationConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("home_team_api_id"));
    }

    #[test]
    fn test_resolve_kinds() {
        let config = AggregationConfig::default();
        assert_eq!(resolve_kinds(&[], &config).len(), config.stats.len());

        let requested = vec!["card".to_string(), " corner ".to_string()];
        assert_eq!(
            resolve_kinds(&requested, &config),
            vec![StatKind::Card, StatKind::parse("corner")]
        );
    }

    #[test]
    fn test_inspect_blob() -> Result<()> {
        let mut xml = NamedTempFile::new()?;
        xml.write_all(CARD_HOME_YELLOW.as_bytes())?;

        let agg = inspect_blob(
            xml.path(),
            MatchTeams::new(10, 20),
            &StatKind::Card,
            &AggregationConfig::default(),
        )?;
        assert_eq!(agg.home.get("yellow_card"), 1);
        assert_eq!(agg.events, 1);
        Ok(())
    }

    #[test]
    fn test_save_metadata() -> Result<()> {
        let meta = BuildMetadata {
            schema_version: FEATURE_SCHEMA_VERSION.to_string(),
            checksum: "abc".to_string(),
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            stats: vec!["card".to_string()],
            matches: 3,
            failed_matches: 0,
            unattributed_events: 2,
        };
        let file = NamedTempFile::new()?;
        save_metadata(file.path(), &meta)?;

        let loaded: BuildMetadata = serde_json::from_str(&fs::read_to_string(file.path())?)?;
        assert_eq!(loaded.matches, 3);
        assert_eq!(loaded.unattributed_events, 2);
        Ok(())
    }
}
