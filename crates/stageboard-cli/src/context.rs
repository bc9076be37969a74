use serde::Serialize;
use stageboard_core::{AppConfig, BoardResult, LogEntry, Loggable};
use stageboard_domain::{columns, BoardEngine, Card, EngineOptions, StageMap};
use stageboard_persistence::{HttpReorderSink, JsonFileStore, Reconciler, ReorderSink, SyncedBoard};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct CliContext {
    pub config: AppConfig,
    pub verbose: bool,
    store: Arc<JsonFileStore>,
    endpoint: Option<String>,
}

/// One column as printed by `show` and after every drop.
#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct ColumnView<M: StageMap> {
    pub id: M::Column,
    pub title: &'static str,
    pub statuses: Vec<M::Status>,
    pub primary_status: M::Status,
    pub count: usize,
    pub total_value: f64,
    pub cards: Vec<Card<M::Status>>,
}

impl CliContext {
    pub fn new(
        file: PathBuf,
        config_path: Option<PathBuf>,
        endpoint: Option<String>,
        verbose: bool,
    ) -> Self {
        let config = match config_path {
            Some(path) => AppConfig::load_from(&path),
            None => AppConfig::load(),
        };
        let endpoint = endpoint.or_else(|| config.reorder_endpoint.clone());
        Self {
            config,
            verbose,
            store: Arc::new(JsonFileStore::new(file)),
            endpoint,
        }
    }

    pub async fn engine<M: StageMap>(&self) -> BoardResult<BoardEngine<M>> {
        let cards = self.store.load_cards::<M>().await?;
        tracing::debug!(entity = M::ENTITY, cards = cards.len(), "board loaded");
        Ok(BoardEngine::new(cards).with_options(EngineOptions::from(&self.config)))
    }

    /// Engine plus a reconciler targeting the configured endpoint, or the
    /// board file when there is none.
    pub async fn synced_board<M: StageMap>(&self) -> BoardResult<SyncedBoard<M>> {
        let engine = self.engine::<M>().await?;
        let sink: Arc<dyn ReorderSink> = match &self.endpoint {
            Some(url) => Arc::new(HttpReorderSink::new(
                url.clone(),
                Duration::from_secs(self.config.effective_request_timeout_secs()),
            )?),
            None => self.store.clone(),
        };
        Ok(SyncedBoard::new(engine, Reconciler::new(sink)))
    }
}

pub fn column_views<M: StageMap>(engine: &BoardEngine<M>) -> Vec<ColumnView<M>> {
    let board = engine.board();
    columns::<M>()
        .into_iter()
        .zip(board.summaries())
        .map(|(info, summary)| ColumnView {
            id: info.id,
            title: info.title,
            statuses: info.statuses,
            primary_status: info.primary_status,
            count: summary.count,
            total_value: summary.total_value,
            cards: board
                .column_cards(info.id)
                .into_iter()
                .cloned()
                .collect(),
        })
        .collect()
}

pub fn activity_log<M: StageMap>(ctx: &CliContext, engine: &BoardEngine<M>) -> Option<Vec<LogEntry>> {
    ctx.verbose.then(|| engine.get_logs().to_vec())
}
