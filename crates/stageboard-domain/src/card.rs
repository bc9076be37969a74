use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Opaque, stable identity of a card. The engine never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl FromStr for CardId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// A movable unit on a board: a deal, potential project, initiative, task
/// or project.
///
/// Only `id`, `status` and `position` are meaningful to the engine. Anything
/// else the loader supplies (title, value, owner...) rides along in `fields`
/// and is written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card<S> {
    pub id: CardId,
    pub status: S,
    pub position: u32,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl<S> Card<S> {
    pub fn new(id: impl Into<CardId>, status: S, position: u32) -> Self {
        Self {
            id: id.into(),
            status,
            position,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Numeric display field, treating absent or non-numeric values as zero.
    pub fn numeric_field(&self, key: &str) -> f64 {
        self.fields.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_fields_survive_a_round_trip() {
        let raw = json!({
            "id": "deal-1",
            "status": "LEAD",
            "position": 2,
            "title": "Office fit-out",
            "value": 12500.5
        });

        let card: Card<String> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(card.id, CardId::from("deal-1"));
        assert_eq!(card.position, 2);
        assert_eq!(card.title(), Some("Office fit-out"));
        assert_eq!(card.numeric_field("value"), 12500.5);

        assert_eq!(serde_json::to_value(&card).unwrap(), raw);
    }

    #[test]
    fn numeric_field_defaults_to_zero() {
        let card = Card::new("t-1", 'x', 0).with_field("value", "not a number");
        assert_eq!(card.numeric_field("value"), 0.0);
        assert_eq!(card.numeric_field("missing"), 0.0);
    }
}
