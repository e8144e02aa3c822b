//! # Match Event Reducer
//!
//! Folds the `<value>` nodes of one match into home/away totals.
//!
//! ## Algorithm
//! 1. Parse the blob; any markup error fails the match
//! 2. Walk `<value>` nodes in document order
//! 3. A node with `<team>` replaces the team context; nodes without one
//!    inherit the last context seen
//! 4. Route the node to the extractor for the requested [`StatKind`]
//! 5. Card and generic increments go to the side owning the context;
//!    events with no matching side are counted as unattributed
//! 6. Possession pairs are added to both sides directly

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::stat_kind::StatKind;
use super::totals::StatTotals;
use super::{POSSESSION, RED_CARD, YELLOW_CARD};
use crate::config::AggregationConfig;
use crate::error::Result;
use crate::events::{
    attribute_team, card_stats, possession_stats, EventField, EventNode, EventTree, MatchTeams,
    Side, SidePair,
};

/// Totals for one match and one stat kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchAggregate {
    pub home: StatTotals,
    pub away: StatTotals,
    /// Card/generic events whose team context matched neither side
    pub unattributed: u32,
    /// `<value>` nodes visited
    pub events: u32,
}

impl MatchAggregate {
    pub fn into_pair(self) -> (StatTotals, StatTotals) {
        (self.home, self.away)
    }

    fn side_mut(&mut self, side: Side) -> &mut StatTotals {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

/// State carried from one event node to the next.
#[derive(Debug, Clone, Default)]
pub struct ReducerState {
    /// Last team id seen; unset until the first `<team>` field
    pub current_team: Option<i64>,
    pub totals: MatchAggregate,
}

/// Per-match transition function.
pub struct MatchReducer<'a> {
    kind: &'a StatKind,
    teams: MatchTeams,
    config: &'a AggregationConfig,
}

impl<'a> MatchReducer<'a> {
    pub fn new(kind: &'a StatKind, teams: MatchTeams, config: &'a AggregationConfig) -> Self {
        Self {
            kind,
            teams,
            config,
        }
    }

    /// Apply one event node to the carried state.
    pub fn step(
        &self,
        mut state: ReducerState,
        event: &EventNode<'_, '_>,
    ) -> Result<ReducerState> {
        if let Some(team) = event.int_field(EventField::Team, self.config.numeric_policy)? {
            state.current_team = Some(team);
        }
        state.totals.events += 1;

        match self.kind {
            StatKind::Card => {
                let cards = card_stats(event);
                match self.teams.side_of(state.current_team) {
                    Some(side) => {
                        let totals = state.totals.side_mut(side);
                        totals.add(YELLOW_CARD, cards.yellow);
                        totals.add(RED_CARD, cards.red);
                    }
                    None => self.drop_event(&mut state),
                }
            }
            StatKind::Possession => {
                let pair = possession_stats(
                    event,
                    self.config.possession_snapshot_minute,
                    self.config.numeric_policy,
                )?;
                state.totals.home.add(POSSESSION, pair.home);
                state.totals.away.add(POSSESSION, pair.away);
            }
            StatKind::Generic(name) => {
                let pair = attribute_team(state.current_team, self.teams);
                state.totals.home.add(name, pair.home);
                state.totals.away.add(name, pair.away);
                if pair == SidePair::ZERO {
                    self.drop_event(&mut state);
                }
            }
        }

        Ok(state)
    }

    fn drop_event(&self, state: &mut ReducerState) {
        state.totals.unattributed += 1;
        trace!(kind = %self.kind, team = ?state.current_team, "event matches neither side");
    }
}

/// Reduce one match blob for one stat kind.
pub fn aggregate_match(
    blob: &str,
    teams: MatchTeams,
    kind: &StatKind,
    config: &AggregationConfig,
) -> Result<MatchAggregate> {
    let tree = EventTree::parse(blob)?;
    let reducer = MatchReducer::new(kind, teams, config);

    let state = tree
        .events()
        .try_fold(ReducerState::default(), |state, event| {
            reducer.step(state, &event)
        })?;

    if state.totals.unattributed > 0 {
        debug!(
            kind = %kind,
            home = teams.home,
            away = teams.away,
            unattributed = state.totals.unattributed,
            events = state.totals.events,
            "unattributed events dropped"
        );
    }

    Ok(state.totals)
}

/// Home and away totals for `stat` with the default configuration.
///
/// ```rust
/// use of_stats::update_match_stats;
///
/// let blob = "<card><value><team>10</team><card_type>y</card_type></value></card>";
/// let (home, away) = update_match_stats(blob, 10, 20, "card").unwrap();
/// assert_eq!(home.get("yellow_card"), 1);
/// assert!(away.is_empty());
/// ```
pub fn update_match_stats(
    blob: &str,
    home_team_id: i64,
    away_team_id: i64,
    stat: &str,
) -> Result<(StatTotals, StatTotals)> {
    let kind = StatKind::parse(stat);
    let teams = MatchTeams::new(home_team_id, away_team_id);
    aggregate_match(blob, teams, &kind, &AggregationConfig::default())
        .map(MatchAggregate::into_pair)
}
