use crate::card::CardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One finalized record: where a card now sits and what status it carries.
///
/// `fields` holds extra values merged in by a transition gate (for example
/// `lost_reason`), flattened next to the core keys on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderUpdate<S> {
    pub id: CardId,
    pub position: u32,
    pub status: S,
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

impl<S> ReorderUpdate<S> {
    pub fn new(id: CardId, position: u32, status: S) -> Self {
        Self {
            id,
            position,
            status,
            fields: BTreeMap::new(),
        }
    }
}

/// The per-drop batch of position/status updates handed to the reconciler.
///
/// Target-column records come first, in their new order, followed by any
/// renumbered records of the column the card left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderBatch<S> {
    pub updates: Vec<ReorderUpdate<S>>,
}

impl<S> Default for ReorderBatch<S> {
    fn default() -> Self {
        Self {
            updates: Vec::new(),
        }
    }
}

impl<S> ReorderBatch<S> {
    pub fn new(updates: Vec<ReorderUpdate<S>>) -> Self {
        Self { updates }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReorderUpdate<S>> {
        self.updates.iter()
    }

    pub fn get(&self, id: &CardId) -> Option<&ReorderUpdate<S>> {
        self.updates.iter().find(|u| &u.id == id)
    }

    /// Attach an extra field to the record for `id`. Returns `false` when
    /// the batch holds no such record.
    pub fn merge_field(&mut self, id: &CardId, key: &str, value: Value) -> bool {
        match self.updates.iter_mut().find(|u| &u.id == id) {
            Some(update) => {
                update.fields.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }
}
