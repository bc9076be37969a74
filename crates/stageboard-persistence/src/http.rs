//! HTTP client for the `PATCH /api/<entity>/reorder` endpoints.

use crate::traits::{ReorderNotice, ReorderReceipt, ReorderRequest, ReorderSink};
use reqwest::Client;
use serde_json::Value;
use stageboard_core::{AppConfig, BoardError, BoardResult};
use std::time::Duration;

/// Pull a readable message out of an error body, falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = json.get("error").and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    body.to_string()
}

fn notices_from_body(body: &Value) -> Vec<ReorderNotice> {
    let mut notices = Vec::new();
    if let Some(project) = body.get("createdProject") {
        let id = project.get("id").and_then(Value::as_str).unwrap_or_default();
        let title = project
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default();
        notices.push(ReorderNotice::ProjectCreated {
            id: id.to_string(),
            title: title.to_string(),
        });
    }
    if let Some(text) = body.get("message").and_then(Value::as_str) {
        notices.push(ReorderNotice::Message {
            text: text.to_string(),
        });
    }
    notices
}

pub struct HttpReorderSink {
    client: Client,
    base_url: String,
}

impl HttpReorderSink {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BoardResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BoardError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build from config; `None` when no endpoint is configured.
    pub fn from_config(config: &AppConfig) -> BoardResult<Option<Self>> {
        match &config.reorder_endpoint {
            Some(endpoint) => Self::new(
                endpoint.clone(),
                Duration::from_secs(config.effective_request_timeout_secs()),
            )
            .map(Some),
            None => Ok(None),
        }
    }

    pub fn endpoint_for(&self, request: &ReorderRequest) -> String {
        format!("{}/api/{}/reorder", self.base_url, request.route)
    }
}

#[async_trait::async_trait]
impl ReorderSink for HttpReorderSink {
    async fn submit(&self, request: ReorderRequest) -> BoardResult<ReorderReceipt> {
        let url = self.endpoint_for(&request);
        tracing::debug!(url = %url, updates = request.len(), "sending reorder batch");

        let response = self
            .client
            .patch(&url)
            .json(&request.to_http_body())
            .send()
            .await
            .map_err(|e| BoardError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BoardError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(BoardError::Rejected {
                status: status.as_u16(),
                body: extract_error_message(&body),
            });
        }

        let notices = match serde_json::from_str::<Value>(&body) {
            Ok(json) => notices_from_body(&json),
            Err(_) => Vec::new(),
        };
        Ok(ReorderReceipt { notices })
    }

    fn describe(&self) -> String {
        format!("reorder endpoint {}", self.base_url)
    }
}
