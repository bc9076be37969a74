//! Fire-and-forget submission of finalized batches.
//!
//! The board never waits on persistence and never rolls back: a failed
//! batch is logged and reported on the outcome channel, and the local view
//! stays authoritative until the next full reload.

use crate::traits::{ReorderNotice, ReorderRequest, ReorderSink};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const OUTCOME_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Persisted {
        entity: String,
        updates: usize,
        notices: Vec<ReorderNotice>,
    },
    Failed {
        entity: String,
        error: String,
    },
}

impl ReconcileOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted { .. })
    }
}

/// Handle to one in-flight submission. Dropping it does not cancel the call.
pub struct Submission {
    entity: String,
    handle: JoinHandle<ReconcileOutcome>,
}

impl Submission {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> ReconcileOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => ReconcileOutcome::Failed {
                entity: self.entity,
                error: format!("submission task failed: {e}"),
            },
        }
    }
}

#[derive(Clone)]
pub struct Reconciler {
    sink: Arc<dyn ReorderSink>,
    outcomes: broadcast::Sender<ReconcileOutcome>,
}

impl Reconciler {
    pub fn new(sink: Arc<dyn ReorderSink>) -> Self {
        let (outcomes, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);
        Self { sink, outcomes }
    }

    /// Outcomes of every submission made after subscribing.
    pub fn subscribe(&self) -> broadcast::Receiver<ReconcileOutcome> {
        self.outcomes.subscribe()
    }

    /// Spawn one persistence call for `request` and return immediately.
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, request: ReorderRequest) -> Submission {
        let sink = Arc::clone(&self.sink);
        let outcomes = self.outcomes.clone();
        let entity = request.entity.clone();

        let handle = tokio::spawn(async move {
            let entity = request.entity.clone();
            let updates = request.len();
            let outcome = match sink.submit(request).await {
                Ok(receipt) => {
                    tracing::info!(
                        entity = %entity,
                        updates,
                        sink = %sink.describe(),
                        "reorder persisted"
                    );
                    for notice in &receipt.notices {
                        tracing::info!(entity = %entity, ?notice, "reorder notice");
                    }
                    ReconcileOutcome::Persisted {
                        entity,
                        updates,
                        notices: receipt.notices,
                    }
                }
                Err(e) => {
                    tracing::error!(
                        entity = %entity,
                        updates,
                        sink = %sink.describe(),
                        "failed to persist reorder: {e}"
                    );
                    ReconcileOutcome::Failed {
                        entity,
                        error: e.to_string(),
                    }
                }
            };
            // No subscribers is fine.
            let _ = outcomes.send(outcome.clone());
            outcome
        });

        Submission { entity, handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockReorderSink, ReorderReceipt};
    use stageboard_core::BoardError;
    use stageboard_domain::{CardId, ReorderBatch, ReorderUpdate, TaskStatus, Tasks};

    fn request() -> ReorderRequest {
        let batch = ReorderBatch::new(vec![
            ReorderUpdate::new(CardId::from("t1"), 0, TaskStatus::Done),
            ReorderUpdate::new(CardId::from("t2"), 1, TaskStatus::Done),
        ]);
        ReorderRequest::from_batch::<Tasks>(&batch)
    }

    #[tokio::test]
    async fn test_successful_submission_is_broadcast() {
        let mut sink = MockReorderSink::new();
        sink.expect_submit()
            .withf(|req| req.entity == "tasks" && req.len() == 2)
            .times(1)
            .returning(|_| {
                Ok(ReorderReceipt {
                    notices: vec![ReorderNotice::Message {
                        text: "ok".to_string(),
                    }],
                })
            });
        sink.expect_describe().returning(|| "mock".to_string());

        let reconciler = Reconciler::new(Arc::new(sink));
        let mut outcomes = reconciler.subscribe();

        let outcome = reconciler.submit(request()).wait().await;
        assert!(outcome.is_persisted());
        assert_eq!(outcomes.recv().await.unwrap(), outcome);
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_raised() {
        let mut sink = MockReorderSink::new();
        sink.expect_submit()
            .times(1)
            .returning(|_| Err(BoardError::Connection("refused".to_string())));
        sink.expect_describe().returning(|| "mock".to_string());

        let reconciler = Reconciler::new(Arc::new(sink));
        let outcome = reconciler.submit(request()).wait().await;

        assert_eq!(
            outcome,
            ReconcileOutcome::Failed {
                entity: "tasks".to_string(),
                error: "Connection error: refused".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_submissions_are_independent() {
        let mut sink = MockReorderSink::new();
        sink.expect_submit().times(3).returning(|_| Ok(ReorderReceipt::default()));
        sink.expect_describe().returning(|| "mock".to_string());

        let reconciler = Reconciler::new(Arc::new(sink));
        let submissions: Vec<_> = (0..3).map(|_| reconciler.submit(request())).collect();
        for submission in submissions {
            assert!(submission.wait().await.is_persisted());
        }
    }
}
