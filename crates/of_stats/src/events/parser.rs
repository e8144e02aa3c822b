//! # Event Tree Parser
//!
//! Parses a per-match event blob and yields its `<value>` nodes in
//! document order.
//!
//! ## Markup
//! ```xml
//! <card>
//!   <value><team>10</team><card_type>y</card_type><elapsed>28</elapsed></value>
//!   <value><card_type>r</card_type></value>
//! </card>
//! ```
//! Only element text is read; attributes and unknown children are ignored.

use tracing::warn;

use crate::config::NumericPolicy;
use crate::error::{Result, StatsError};

/// Tag name of one event record.
pub const EVENT_TAG: &str = "value";

/// Leaf fields read from an event node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    Team,
    CardType,
    Elapsed,
    HomePos,
    AwayPos,
}

impl EventField {
    pub fn tag(self) -> &'static str {
        match self {
            EventField::Team => "team",
            EventField::CardType => "card_type",
            EventField::Elapsed => "elapsed",
            EventField::HomePos => "homepos",
            EventField::AwayPos => "awaypos",
        }
    }
}

/// Parsed event document for one match.
pub struct EventTree<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> EventTree<'input> {
    /// Parse a markup blob. Malformed markup is fatal for the whole match.
    pub fn parse(blob: &'input str) -> Result<Self> {
        let doc = roxmltree::Document::parse(blob)?;
        Ok(Self { doc })
    }

    /// All `<value>` elements at any depth, in document order.
    pub fn events(&self) -> impl Iterator<Item = EventNode<'_, 'input>> + '_ {
        self.doc
            .root_element()
            .descendants()
            .filter(|n| n.is_element() && n.has_tag_name(EVENT_TAG))
            .map(|node| EventNode { node })
    }
}

/// One `<value>` element.
#[derive(Debug, Clone, Copy)]
pub struct EventNode<'a, 'input> {
    node: roxmltree::Node<'a, 'input>,
}

impl<'a, 'input> EventNode<'a, 'input> {
    /// Text of a direct child field.
    ///
    /// * `None` - the child element is absent
    /// * `Some("")` - the child is present but has no text
    pub fn field(&self, field: EventField) -> Option<&'a str> {
        self.node
            .children()
            .find(|c| c.is_element() && c.has_tag_name(field.tag()))
            .map(|c| c.text().unwrap_or(""))
    }

    /// Integer value of a direct child field.
    ///
    /// Absent fields yield `Ok(None)`. Text that is not an integer fails under
    /// [`NumericPolicy::Strict`] and reads as `Some(0)` under
    /// [`NumericPolicy::Lenient`]. A coerced `team` therefore replaces the
    /// context with id 0 instead of keeping the previous team.
    pub fn int_field(&self, field: EventField, policy: NumericPolicy) -> Result<Option<i64>> {
        let Some(text) = self.field(field) else {
            return Ok(None);
        };

        match text.trim().parse::<i64>() {
            Ok(v) => Ok(Some(v)),
            Err(_) => match policy {
                NumericPolicy::Strict => Err(StatsError::InvalidNumber {
                    field: field.tag(),
                    text: text.to_string(),
                }),
                NumericPolicy::Lenient => {
                    warn!(field = field.tag(), text, "non-numeric field read as 0");
                    Ok(Some(0))
                }
            },
        }
    }
}
