//! # Event Extractors
//!
//! Per-stat functions that turn one event node into a small pair of
//! increments. All extractors are pure over their inputs.
//!
//! - [`card_stats`] - `(yellow, red)` for one card event
//! - [`possession_stats`] - `(home, away)` possession at full time
//! - [`attribute_team`] - `(home, away)` attribution by team context

use crate::config::NumericPolicy;
use crate::error::Result;
use crate::events::parser::{EventField, EventNode};

/// Card colour carried in `<card_type>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    Yellow,
    Red,
}

impl CardType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "y" => Some(CardType::Yellow),
            "r" => Some(CardType::Red),
            _ => None,
        }
    }
}

/// Pair of increments for the two sides of one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidePair {
    pub home: i64,
    pub away: i64,
}

impl SidePair {
    pub const ZERO: SidePair = SidePair { home: 0, away: 0 };

    pub fn new(home: i64, away: i64) -> Self {
        Self { home, away }
    }
}

/// Card increments of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardCount {
    pub yellow: i64,
    pub red: i64,
}

impl CardCount {
    pub fn is_empty(&self) -> bool {
        self.yellow == 0 && self.red == 0
    }
}

/// Which side of the match a team id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// Home and away team ids of one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTeams {
    pub home: i64,
    pub away: i64,
}

impl MatchTeams {
    pub fn new(home: i64, away: i64) -> Self {
        Self { home, away }
    }

    /// Side of `team`, or `None` when unknown or neutral. Equal ids resolve
    /// to home.
    pub fn side_of(&self, team: Option<i64>) -> Option<Side> {
        match team {
            Some(t) if t == self.home => Some(Side::Home),
            Some(t) if t == self.away => Some(Side::Away),
            _ => None,
        }
    }
}

/// Card increments for one event. A missing or unknown `card_type` is no card.
pub fn card_stats(event: &EventNode<'_, '_>) -> CardCount {
    match event.field(EventField::CardType).and_then(CardType::from_code) {
        Some(CardType::Yellow) => CardCount { yellow: 1, red: 0 },
        Some(CardType::Red) => CardCount { yellow: 0, red: 1 },
        None => CardCount::default(),
    }
}

/// Possession shares for one snapshot.
///
/// Possession in the feed is cumulative, so only snapshots taken at or after
/// `snapshot_minute` count; earlier ones yield zero.
pub fn possession_stats(
    event: &EventNode<'_, '_>,
    snapshot_minute: i64,
    policy: NumericPolicy,
) -> Result<SidePair> {
    let elapsed = event.int_field(EventField::Elapsed, policy)?.unwrap_or(0);
    if elapsed < snapshot_minute {
        return Ok(SidePair::ZERO);
    }

    // Shares are percentages; a negative share counts as missing.
    let home = event.int_field(EventField::HomePos, policy)?.unwrap_or(0).max(0);
    let away = event.int_field(EventField::AwayPos, policy)?.unwrap_or(0).max(0);
    Ok(SidePair::new(home, away))
}

/// One count for each side `current_team` belongs to.
///
/// Sides are checked independently, so a match whose home and away ids are
/// equal counts the event for both.
pub fn attribute_team(current_team: Option<i64>, teams: MatchTeams) -> SidePair {
    match current_team {
        Some(team) => SidePair::new(
            i64::from(team == teams.home),
            i64::from(team == teams.away),
        ),
        None => SidePair::ZERO,
    }
}
