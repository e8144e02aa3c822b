//! # Event Parsing Module
//!
//! Turns a per-match markup blob into event nodes and per-node increments.
//!
//! - `parser` - Markup tree and `<value>` node access
//! - `extractors` - Card, possession and team attribution extractors

pub mod extractors;
pub mod parser;

pub use extractors::{
    attribute_team, card_stats, possession_stats, CardCount, CardType, MatchTeams, Side,
    SidePair,
};
pub use parser::{EventField, EventNode, EventTree, EVENT_TAG};
