//! # Aggregation Module
//!
//! Reduces one match's event nodes into per-side totals.
//!
//! - `stat_kind` - Closed set of requested statistics
//! - `totals` - Default-zero per-side stat map
//! - `reducer` - Fold over event nodes with carried team context

pub mod reducer;
pub mod stat_kind;
pub mod totals;

pub use reducer::{aggregate_match, update_match_stats, MatchAggregate, MatchReducer, ReducerState};
pub use stat_kind::StatKind;
pub use totals::StatTotals;

/// Totals key for yellow cards.
pub const YELLOW_CARD: &str = "yellow_card";
/// Totals key for red cards.
pub const RED_CARD: &str = "red_card";
/// Totals key for full-time possession.
pub const POSSESSION: &str = "possession";
