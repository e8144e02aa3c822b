//! # of_stats - Match-Event Aggregation Engine
//!
//! Reads the per-match event blobs of a football results table (cards,
//! possession snapshots, shots, corners, ...) and reduces them into
//! home/away statistic totals for feature building.
//!
//! ## Features
//! - Document-order reduction with carried team context
//! - Card, possession and generic per-event attribution
//! - Strict or lenient handling of malformed numeric fields
//! - Parallel batch building of per-match feature rows

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod outcome;

pub use aggregate::{
    aggregate_match, update_match_stats, MatchAggregate, StatKind, StatTotals, POSSESSION,
    RED_CARD, YELLOW_CARD,
};
pub use batch::{
    build_feature_row, build_feature_rows, BatchReport, MatchFeatureRow, MatchRecord, StatCell,
};
pub use config::{AggregationConfig, NumericPolicy};
pub use error::{Result, StatsError};
pub use events::MatchTeams;
pub use outcome::{expected_outcome, ExpectedOutcome, MatchOdds};
