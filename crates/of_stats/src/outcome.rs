//! # Expected Outcome
//!
//! Bookmaker favourite of a match, taken from averaged decimal odds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Decimal odds averaged over bookmakers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOdds {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl ExpectedOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedOutcome::HomeWin => "home_win",
            ExpectedOutcome::AwayWin => "away_win",
            ExpectedOutcome::Draw => "draw",
        }
    }
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome with the lowest odds.
///
/// Ties go to the first of home win, away win, draw. Returns `None` if any
/// odds value is NaN.
pub fn expected_outcome(odds: &MatchOdds) -> Option<ExpectedOutcome> {
    let candidates = [
        (ExpectedOutcome::HomeWin, odds.home_win),
        (ExpectedOutcome::AwayWin, odds.away_win),
        (ExpectedOutcome::Draw, odds.draw),
    ];
    if candidates.iter().any(|(_, v)| v.is_nan()) {
        return None;
    }

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    Some(best.0)
}
