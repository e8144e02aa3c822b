use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested statistic, resolved once before a match is reduced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatKind {
    /// Yellow and red cards per side
    Card,
    /// Full-time possession share per side
    Possession,
    /// One count per event for the side holding the team context
    Generic(String),
}

impl StatKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "card" => StatKind::Card,
            "possession" => StatKind::Possession,
            other => StatKind::Generic(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StatKind::Card => "card",
            StatKind::Possession => "possession",
            StatKind::Generic(name) => name,
        }
    }

    /// Keys this kind writes into a side's totals.
    pub fn total_keys(&self) -> Vec<&str> {
        match self {
            StatKind::Card => vec![super::YELLOW_CARD, super::RED_CARD],
            StatKind::Possession => vec![super::POSSESSION],
            StatKind::Generic(name) => vec![name.as_str()],
        }
    }
}

impl FromStr for StatKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(StatKind::parse(s))
    }
}

impl From<String> for StatKind {
    fn from(name: String) -> Self {
        StatKind::parse(&name)
    }
}

impl From<StatKind> for String {
    fn from(kind: StatKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
