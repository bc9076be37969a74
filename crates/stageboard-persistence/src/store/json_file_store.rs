use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{PersistenceMetadata, ReorderNotice, ReorderReceipt, ReorderRequest, ReorderSink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stageboard_core::{BoardError, BoardResult, StageKey};
use stageboard_domain::reorder::next_position_in_column;
use stageboard_domain::{
    Card, DealStage, Deals, Initiatives, PotentialProjects, ProjectStatus, Projects, StageMap,
    Tasks,
};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

const COLLECTIONS: [&str; 5] = [
    Deals::ENTITY,
    PotentialProjects::ENTITY,
    Initiatives::ENTITY,
    Tasks::ENTITY,
    Projects::ENTITY,
];

/// On-disk layout of a board file.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    /// Card lists keyed by entity collection name.
    pub data: Map<String, Value>,
}

impl JsonEnvelope {
    fn empty(instance_id: Uuid) -> Self {
        let mut envelope = Self {
            version: FORMAT_VERSION,
            metadata: PersistenceMetadata::new(instance_id),
            data: Map::new(),
        };
        envelope.ensure_collections();
        envelope
    }

    fn ensure_collections(&mut self) {
        for name in COLLECTIONS {
            self.data
                .entry(name.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
        }
    }
}

/// JSON file holding every board, applying reorder batches the way the
/// server routes do.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_instance_id(path, Uuid::new_v4())
    }

    /// Create a store with a specific instance ID
    pub fn with_instance_id(path: impl AsRef<Path>, instance_id: Uuid) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id,
            lock: Mutex::new(()),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Cards of one entity. A missing file or collection is an empty board.
    pub async fn load_cards<M: StageMap>(&self) -> BoardResult<Vec<Card<M::Status>>> {
        let _guard = self.lock.lock().await;
        let envelope = self.read_envelope().await?;
        match envelope.data.get(M::ENTITY) {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| BoardError::Serialization(format!("{}: {e}", M::ENTITY))),
            None => Ok(Vec::new()),
        }
    }

    /// Replace one entity's cards, leaving the other collections untouched.
    pub async fn save_cards<M: StageMap>(
        &self,
        cards: &[Card<M::Status>],
    ) -> BoardResult<PersistenceMetadata> {
        let _guard = self.lock.lock().await;
        let mut envelope = self.read_envelope().await?;
        let value = serde_json::to_value(cards)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        envelope.data.insert(M::ENTITY.to_string(), value);
        self.write_envelope(envelope).await
    }

    async fn read_envelope(&self) -> BoardResult<JsonEnvelope> {
        let Some(bytes) = AtomicWriter::read_optional(&self.path).await? else {
            return Ok(JsonEnvelope::empty(self.instance_id));
        };
        let envelope: JsonEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        if envelope.version != FORMAT_VERSION {
            return Err(BoardError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }
        Ok(envelope)
    }

    async fn write_envelope(&self, mut envelope: JsonEnvelope) -> BoardResult<PersistenceMetadata> {
        envelope.metadata = PersistenceMetadata::new(self.instance_id);
        envelope.ensure_collections();

        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &json_bytes).await?;

        tracing::info!(
            "Saved {} bytes to {}",
            json_bytes.len(),
            self.path.display()
        );
        Ok(envelope.metadata)
    }
}

#[async_trait::async_trait]
impl ReorderSink for JsonFileStore {
    async fn submit(&self, request: ReorderRequest) -> BoardResult<ReorderReceipt> {
        let _guard = self.lock.lock().await;
        let mut envelope = self.read_envelope().await?;
        let notices = apply_request(&mut envelope.data, &request, Utc::now())?;
        self.write_envelope(envelope).await?;

        tracing::info!(
            entity = %request.entity,
            updates = request.len(),
            notices = notices.len(),
            "reorder applied to board file"
        );
        Ok(ReorderReceipt { notices })
    }

    fn describe(&self) -> String {
        format!("board file {}", self.path.display())
    }
}

/// Apply a batch to the in-memory collections. Every id is checked before
/// anything is touched.
fn apply_request(
    data: &mut Map<String, Value>,
    request: &ReorderRequest,
    now: DateTime<Utc>,
) -> BoardResult<Vec<ReorderNotice>> {
    let records = data
        .entry(request.entity.clone())
        .or_insert_with(|| Value::Array(Vec::new()));
    let Value::Array(records) = records else {
        return Err(BoardError::Serialization(format!(
            "collection {} is not a list",
            request.entity
        )));
    };

    let mut indices = Vec::with_capacity(request.len());
    for update in &request.updates {
        let index = records
            .iter()
            .position(|r| r.get("id").and_then(Value::as_str) == Some(update.id.as_str()))
            .ok_or_else(|| BoardError::NotFound(format!("{} {}", request.entity, update.id)))?;
        indices.push(index);
    }

    let mut won = Vec::new();
    for (update, index) in request.updates.iter().zip(indices) {
        let Some(record) = records[index].as_object_mut() else {
            continue;
        };
        let changed =
            record.get("status").and_then(Value::as_str) != Some(update.status.as_str());

        record.insert("position".to_string(), Value::from(update.position));
        record.insert("status".to_string(), Value::String(update.status.clone()));
        if changed {
            record.insert(
                "stage_changed_at".to_string(),
                Value::String(now.to_rfc3339()),
            );
        }
        for (key, value) in &update.fields {
            let value = match value {
                Value::String(s) if s.is_empty() => Value::Null,
                other => other.clone(),
            };
            record.insert(key.clone(), value);
        }

        if changed && request.entity == Deals::ENTITY && update.status == DealStage::Won.as_str()
        {
            let title = record
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            won.push((update.id.clone(), title));
        }
    }

    won.into_iter()
        .map(|(deal_id, title)| create_project(data, &deal_id, title, now))
        .collect()
}

fn create_project(
    data: &mut Map<String, Value>,
    deal_id: &str,
    title: String,
    now: DateTime<Utc>,
) -> BoardResult<ReorderNotice> {
    let projects = data
        .entry(Projects::ENTITY.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    let existing: Vec<Card<ProjectStatus>> = serde_json::from_value(projects.clone())
        .map_err(|e| BoardError::Serialization(format!("{}: {e}", Projects::ENTITY)))?;
    let position = next_position_in_column::<Projects>(&existing, ProjectStatus::Draft);

    let id = Uuid::new_v4().to_string();
    let project = Card::new(id.clone(), ProjectStatus::Draft, position)
        .with_field("title", title.clone())
        .with_field("deal_id", deal_id)
        .with_field("created_at", now.to_rfc3339());
    let value =
        serde_json::to_value(project).map_err(|e| BoardError::Serialization(e.to_string()))?;

    if let Value::Array(list) = projects {
        list.push(value);
    }
    tracing::info!(deal = deal_id, project = %id, "derived project created");
    Ok(ReorderNotice::ProjectCreated { id, title })
}
