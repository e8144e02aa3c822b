//! # Batch Feature Builder
//!
//! Runs the aggregator over many matches and all requested stat kinds,
//! producing one feature row per match.
//!
//! Matches are independent, so rows are built in parallel; output order
//! follows input order. A failing (match, stat kind) pair leaves only that
//! cell unset.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::{aggregate_match, MatchAggregate, StatKind};
use crate::config::AggregationConfig;
use crate::events::MatchTeams;
use crate::outcome::{expected_outcome, ExpectedOutcome, MatchOdds};

/// One row of the match table.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub match_id: i64,
    pub teams: MatchTeams,
    /// Event blob per stat column; empty cells are left out
    pub blobs: HashMap<String, String>,
    pub odds: Option<MatchOdds>,
}

/// Result for one (match, stat kind) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatCell {
    /// No blob for this stat
    Missing,
    /// Blob could not be aggregated
    Failed { error: String },
    Aggregated(MatchAggregate),
}

impl StatCell {
    pub fn aggregate(&self) -> Option<&MatchAggregate> {
        match self {
            StatCell::Aggregated(agg) => Some(agg),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StatCell::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchFeatureRow {
    pub match_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    /// One cell per requested stat kind, in request order
    pub cells: Vec<StatCell>,
    pub expected_outcome: Option<ExpectedOutcome>,
}

impl MatchFeatureRow {
    pub fn failed_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_failed()).count()
    }
}

/// Rows plus run counters.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub rows: Vec<MatchFeatureRow>,
    /// Matches with at least one failed cell
    pub failed_matches: usize,
    /// Unattributed events summed over all aggregated cells
    pub unattributed_events: u64,
}

/// Aggregate every requested stat kind of one match.
pub fn build_feature_row(
    record: &MatchRecord,
    kinds: &[StatKind],
    config: &AggregationConfig,
) -> MatchFeatureRow {
    let cells = kinds
        .iter()
        .map(|kind| match record.blobs.get(kind.name()) {
            None => StatCell::Missing,
            Some(blob) => match aggregate_match(blob, record.teams, kind, config) {
                Ok(agg) => StatCell::Aggregated(agg),
                Err(e) => {
                    warn!(
                        match_id = record.match_id,
                        kind = %kind,
                        error = %e,
                        "stat aggregation failed"
                    );
                    StatCell::Failed {
                        error: e.to_string(),
                    }
                }
            },
        })
        .collect();

    MatchFeatureRow {
        match_id: record.match_id,
        home_team_id: record.teams.home,
        away_team_id: record.teams.away,
        cells,
        expected_outcome: record.odds.as_ref().and_then(expected_outcome),
    }
}

/// Build feature rows for all matches in parallel.
pub fn build_feature_rows(
    records: &[MatchRecord],
    kinds: &[StatKind],
    config: &AggregationConfig,
) -> BatchReport {
    let rows: Vec<MatchFeatureRow> = records
        .par_iter()
        .map(|record| build_feature_row(record, kinds, config))
        .collect();

    let failed_matches = rows.iter().filter(|r| r.failed_cells() > 0).count();
    let unattributed_events = rows
        .iter()
        .flat_map(|r| r.cells.iter())
        .filter_map(StatCell::aggregate)
        .map(|agg| agg.unattributed as u64)
        .sum();

    info!(
        matches = rows.len(),
        kinds = kinds.len(),
        failed_matches,
        unattributed_events,
        "feature rows built"
    );

    BatchReport {
        rows,
        failed_matches,
        unattributed_events,
    }
}
