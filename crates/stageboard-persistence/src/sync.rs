use crate::reconciler::{ReconcileOutcome, Reconciler, Submission};
use crate::traits::ReorderRequest;
use stageboard_core::BoardResult;
use stageboard_domain::{BoardEngine, CardId, CommittedDrop, DropOutcome, DropTarget, StageMap};

/// A board engine wired to a reconciler: every committed drop is submitted
/// for persistence without waiting on it.
pub struct SyncedBoard<M: StageMap> {
    engine: BoardEngine<M>,
    reconciler: Reconciler,
    in_flight: Vec<Submission>,
}

impl<M: StageMap> SyncedBoard<M> {
    pub fn new(engine: BoardEngine<M>, reconciler: Reconciler) -> Self {
        Self {
            engine,
            reconciler,
            in_flight: Vec::new(),
        }
    }

    pub fn engine(&self) -> &BoardEngine<M> {
        &self.engine
    }

    /// Direct access for drag-over previews and collaborator updates.
    pub fn engine_mut(&mut self) -> &mut BoardEngine<M> {
        &mut self.engine
    }

    pub fn drag_start(&mut self, card_id: &CardId) -> BoardResult<()> {
        self.engine.drag_start(card_id)
    }

    pub fn drag_over(&mut self, target: Option<&DropTarget<M::Column>>) -> Option<M::Column> {
        self.engine.drag_over(target)
    }

    pub fn drag_end(&mut self, target: Option<&DropTarget<M::Column>>) -> DropOutcome<M> {
        let outcome = self.engine.drag_end(target);
        if let DropOutcome::Committed(drop) = &outcome {
            self.persist(drop);
        }
        outcome
    }

    pub fn confirm_gate(&mut self, input: &str) -> BoardResult<CommittedDrop<M>> {
        let drop = self.engine.confirm_gate(input)?;
        self.persist(&drop);
        Ok(drop)
    }

    pub fn cancel_gate(&mut self) -> BoardResult<()> {
        self.engine.cancel_gate()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait for every submission still tracked, in submission order.
    /// Submissions that finished before a later drop was persisted are no
    /// longer tracked; their outcomes went out on the reconciler's channel.
    pub async fn flush(&mut self) -> Vec<ReconcileOutcome> {
        let mut outcomes = Vec::with_capacity(self.in_flight.len());
        for submission in self.in_flight.drain(..) {
            outcomes.push(submission.wait().await);
        }
        outcomes
    }

    fn persist(&mut self, drop: &CommittedDrop<M>) {
        self.in_flight.retain(|submission| !submission.is_finished());
        let request = ReorderRequest::from_batch::<M>(&drop.batch);
        self.in_flight.push(self.reconciler.submit(request));
    }
}
