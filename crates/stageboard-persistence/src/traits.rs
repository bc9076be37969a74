use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stageboard_core::{BoardResult, StageKey};
use stageboard_domain::{ReorderBatch, StageMap};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Metadata stamped on every save of a board file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    /// ID of the instance that performed the save
    pub instance_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(instance_id: Uuid) -> Self {
        Self {
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// One record of a reorder request, with the status already rendered to its
/// wire name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireUpdate {
    pub id: String,
    pub position: u32,
    pub status: String,
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

/// Entity-agnostic form of a finalized batch, ready for any sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRequest {
    /// Collection name, e.g. `"potential_projects"`.
    pub entity: String,
    /// Route segment, e.g. `"potential-projects"`.
    pub route: String,
    /// Key the status travels under on the HTTP wire.
    pub status_key: String,
    pub updates: Vec<WireUpdate>,
}

impl ReorderRequest {
    pub fn from_batch<M: StageMap>(batch: &ReorderBatch<M::Status>) -> Self {
        Self {
            entity: M::ENTITY.to_string(),
            route: M::ROUTE.to_string(),
            status_key: M::STATUS_KEY.to_string(),
            updates: batch
                .iter()
                .map(|update| WireUpdate {
                    id: update.id.to_string(),
                    position: update.position,
                    status: update.status.as_str().to_string(),
                    fields: update.fields.clone(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// `{"updates": [...]}` with camelCase keys and the status under
    /// `status_key`, as the reorder endpoints expect.
    pub fn to_http_body(&self) -> Value {
        let updates: Vec<Value> = self
            .updates
            .iter()
            .map(|update| {
                let mut record = Map::new();
                record.insert("id".to_string(), Value::String(update.id.clone()));
                record.insert("position".to_string(), Value::from(update.position));
                record.insert(
                    self.status_key.clone(),
                    Value::String(update.status.clone()),
                );
                for (key, value) in &update.fields {
                    record.insert(camel_case(key), value.clone());
                }
                Value::Object(record)
            })
            .collect();
        serde_json::json!({ "updates": updates })
    }
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Advisory side-channel returned with a successful reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReorderNotice {
    /// Moving the card spawned a derived record (a deal won became a project).
    ProjectCreated { id: String, title: String },
    Message { text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReorderReceipt {
    pub notices: Vec<ReorderNotice>,
}

/// The external persistence collaborator a reconciler submits batches to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReorderSink: Send + Sync {
    /// Persist one batch. Failures are reported, never retried here.
    async fn submit(&self, request: ReorderRequest) -> BoardResult<ReorderReceipt>;

    /// Short human-readable name for logs.
    fn describe(&self) -> String;
}
