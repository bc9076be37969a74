//! The board engine: one stage map, its gates, and the drag state machine.
//!
//! `Idle -> Dragging -> Idle` for plain drops, or
//! `Idle -> Dragging -> AwaitingGate -> Idle` when a gate holds the drop.
//! Every transition is synchronous; persistence happens elsewhere with the
//! batch carried by [`CommittedDrop`].

use crate::batch::ReorderBatch;
use crate::board::BoardState;
use crate::card::{Card, CardId};
use crate::collision::{resolve_collision, CollisionInput, DropTarget};
use crate::gate::{normalize_gate_input, GatePrompt, PendingTransition, TransitionGate};
use crate::reorder::{plan_drop, Placement};
use crate::session::{DragPhase, DragSession};
use crate::stage_map::StageMap;
use serde::Serialize;
use serde_json::Value;
use stageboard_core::{AppConfig, BoardError, BoardResult, LogEntry, Loggable, StageKey};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Renumber the column a card leaves as part of the same batch.
    pub renumber_origin_column: bool,
    /// Refuse empty gate input.
    pub require_gate_input: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            renumber_origin_column: true,
            require_gate_input: false,
        }
    }
}

impl From<&AppConfig> for EngineOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            renumber_origin_column: config.effective_renumber_origin_column(),
            require_gate_input: config.effective_require_gate_input(),
        }
    }
}

/// A drop that has been applied locally and is ready to persist.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct CommittedDrop<M: StageMap> {
    pub card_id: CardId,
    pub from: M::Column,
    pub to: M::Column,
    pub batch: ReorderBatch<M::Status>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case", bound = "")]
pub enum DropOutcome<M: StageMap> {
    Committed(CommittedDrop<M>),
    /// A gate is holding the drop; answer with `confirm_gate` or `cancel_gate`.
    AwaitingConfirmation(GatePrompt),
    /// Released over nothing; the card's status was restored.
    Cancelled,
    /// No session, or the dragged card vanished mid-gesture.
    Ignored,
}

enum Phase<M: StageMap> {
    Idle,
    Dragging(DragSession<M>),
    AwaitingGate(PendingTransition<M::Status, M::Column>),
}

pub struct BoardEngine<M: StageMap> {
    board: BoardState<M>,
    gates: Vec<Box<dyn TransitionGate<M::Column>>>,
    options: EngineOptions,
    phase: Phase<M>,
    logs: Vec<LogEntry>,
}

impl<M: StageMap> BoardEngine<M> {
    /// Engine over `cards` with the entity's default gates.
    pub fn new(cards: Vec<Card<M::Status>>) -> Self {
        Self {
            board: BoardState::new(cards),
            gates: M::default_gates(),
            options: EngineOptions::default(),
            phase: Phase::Idle,
            logs: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the installed gates.
    pub fn with_gates(mut self, gates: Vec<Box<dyn TransitionGate<M::Column>>>) -> Self {
        self.gates = gates;
        self
    }

    pub fn add_gate(&mut self, gate: Box<dyn TransitionGate<M::Column>>) {
        self.gates.push(gate);
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Replace the board wholesale. Any session or pending gate is dropped.
    pub fn load(&mut self, cards: Vec<Card<M::Status>>) {
        self.board.load(cards);
        self.phase = Phase::Idle;
    }

    pub fn board(&self) -> &BoardState<M> {
        &self.board
    }

    pub fn phase(&self) -> DragPhase {
        match self.phase {
            Phase::Idle => DragPhase::Idle,
            Phase::Dragging(_) => DragPhase::Dragging,
            Phase::AwaitingGate(_) => DragPhase::AwaitingGate,
        }
    }

    pub fn session(&self) -> Option<&DragSession<M>> {
        match &self.phase {
            Phase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingTransition<M::Status, M::Column>> {
        match &self.phase {
            Phase::AwaitingGate(pending) => Some(pending),
            _ => None,
        }
    }

    /// Column a target stands for. Cards resolve through their current status.
    pub fn resolve_column(&self, target: &DropTarget<M::Column>) -> Option<M::Column> {
        match target {
            DropTarget::Column(column) => Some(*column),
            DropTarget::Card(id) => self.board.column_of_card(id),
        }
    }

    pub fn drag_start(&mut self, card_id: &CardId) -> BoardResult<()> {
        match &self.phase {
            Phase::Dragging(session) => {
                return Err(BoardError::SessionActive {
                    card_id: session.card_id.to_string(),
                })
            }
            Phase::AwaitingGate(pending) => {
                return Err(BoardError::GatePending {
                    card_id: pending.card_id.to_string(),
                })
            }
            Phase::Idle => {}
        }

        let card = self
            .board
            .card(card_id)
            .ok_or_else(|| BoardError::NotFound(format!("card {card_id}")))?;
        let original_status = card.status;

        info!(card = %card_id, status = original_status.as_str(), "drag started");
        self.add_log(format!(
            "Started dragging {card_id} from {}",
            original_status.as_str()
        ));
        self.phase = Phase::Dragging(DragSession::new(card_id.clone(), original_status));
        Ok(())
    }

    /// Preview the drop: if the target's column differs from the card's
    /// current one, give the card that column's primary status. Positions are
    /// left alone. Returns the column the target resolved to.
    pub fn drag_over(&mut self, target: Option<&DropTarget<M::Column>>) -> Option<M::Column> {
        let Phase::Dragging(session) = &mut self.phase else {
            return None;
        };
        session.over = target.cloned();
        let card_id = session.card_id.clone();

        let target = target?;
        let column = match target {
            DropTarget::Column(column) => *column,
            DropTarget::Card(id) => self.board.column_of_card(id)?,
        };
        let current = self.board.column_of_card(&card_id)?;

        if current != column {
            let preview = M::primary_status_of(column);
            debug!(
                card = %card_id,
                status = preview.as_str(),
                "optimistic status preview"
            );
            self.board.set_status(&card_id, preview);
        }
        Some(column)
    }

    /// Run the collision resolver against the current geometry and feed the
    /// result to [`Self::drag_over`].
    pub fn drag_move(&mut self, input: &CollisionInput<'_, M::Column>) -> Option<DropTarget<M::Column>> {
        if !matches!(self.phase, Phase::Dragging(_)) {
            return None;
        }
        let target = resolve_collision(input);
        self.drag_over(target.as_ref());
        target
    }

    /// Release the dragged card over `target` (`None` = outside every region).
    pub fn drag_end(&mut self, target: Option<&DropTarget<M::Column>>) -> DropOutcome<M> {
        let session = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(session) => session,
            other => {
                self.phase = other;
                return DropOutcome::Ignored;
            }
        };

        if !self.board.contains(&session.card_id) {
            warn!(card = %session.card_id, "dragged card left the board mid-gesture");
            return DropOutcome::Ignored;
        }

        let Some(target) = target else {
            self.revert(&session.card_id, session.original_status);
            self.add_log(format!(
                "Dropped {} outside the board",
                session.card_id
            ));
            return DropOutcome::Cancelled;
        };

        let (to, placement) = match target {
            DropTarget::Column(column) => (*column, Placement::End),
            DropTarget::Card(over) => match self.board.column_of_card(over) {
                Some(column) => (column, Placement::OnCard(over.clone())),
                None => match self.board.column_of_card(&session.card_id) {
                    Some(column) => (column, Placement::End),
                    None => return DropOutcome::Ignored,
                },
            },
        };
        let from = session.origin_column();

        let Some(batch) = plan_drop::<M>(
            self.board.cards(),
            &session.card_id,
            session.original_status,
            to,
            &placement,
            self.options.renumber_origin_column,
        ) else {
            return DropOutcome::Ignored;
        };

        if from != to {
            if let Some(gate) = self
                .gates
                .iter()
                .find(|gate| gate.requires_confirmation(from, to))
            {
                let prompt = gate.prompt();
                self.board
                    .set_status(&session.card_id, M::primary_status_of(to));
                info!(
                    card = %session.card_id,
                    to = to.as_str(),
                    "drop held for confirmation"
                );
                self.add_log(format!(
                    "Moving {} to {} needs confirmation",
                    session.card_id,
                    to.as_str()
                ));
                self.phase = Phase::AwaitingGate(PendingTransition {
                    card_id: session.card_id,
                    original_status: session.original_status,
                    from,
                    to,
                    batch,
                    prompt: prompt.clone(),
                });
                return DropOutcome::AwaitingConfirmation(prompt);
            }
        }

        DropOutcome::Committed(self.commit(session.card_id, from, to, batch))
    }

    /// Abort the gesture (escape key, lost pointer). Same effect as a drop
    /// outside every region.
    pub fn drag_cancel(&mut self) -> DropOutcome<M> {
        self.drag_end(None)
    }

    /// Resolve the pending gate with `input` and commit its batch.
    ///
    /// With `require_gate_input` set, blank input fails with `Validation` and
    /// the transition stays pending.
    pub fn confirm_gate(&mut self, input: &str) -> BoardResult<CommittedDrop<M>> {
        if !matches!(self.phase, Phase::AwaitingGate(_)) {
            return Err(BoardError::NoPendingTransition);
        }
        let input = normalize_gate_input(input, self.options.require_gate_input)?;

        let Phase::AwaitingGate(mut pending) = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return Err(BoardError::NoPendingTransition);
        };
        let card_id = pending.card_id.clone();
        pending
            .batch
            .merge_field(&card_id, &pending.prompt.field, Value::String(input));

        self.add_log(format!("Confirmed move of {card_id}"));
        Ok(self.commit(card_id, pending.from, pending.to, pending.batch))
    }

    /// Discard the pending gate: the card's status is restored and nothing
    /// is persisted.
    pub fn cancel_gate(&mut self) -> BoardResult<()> {
        let pending = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::AwaitingGate(pending) => pending,
            other => {
                self.phase = other;
                return Err(BoardError::NoPendingTransition);
            }
        };
        self.revert(&pending.card_id, pending.original_status);
        self.add_log(format!("Cancelled move of {}", pending.card_id));
        Ok(())
    }

    /// Insert or replace a card created by an outside collaborator.
    pub fn upsert_card(&mut self, card: Card<M::Status>) {
        self.board.upsert(card);
    }

    /// Remove a card deleted by an outside collaborator.
    pub fn remove_card(&mut self, card_id: &CardId) -> Option<Card<M::Status>> {
        self.board.remove(card_id)
    }

    fn revert(&mut self, card_id: &CardId, original_status: M::Status) {
        if self.board.set_status(card_id, original_status) {
            info!(card = %card_id, status = original_status.as_str(), "drag reverted");
        }
    }

    fn commit(
        &mut self,
        card_id: CardId,
        from: M::Column,
        to: M::Column,
        batch: ReorderBatch<M::Status>,
    ) -> CommittedDrop<M> {
        self.board.apply_batch(&batch);
        info!(
            card = %card_id,
            from = from.as_str(),
            to = to.as_str(),
            updates = batch.len(),
            "drop committed"
        );
        self.add_log(format!(
            "Moved {card_id} from {} to {}",
            from.as_str(),
            to.as_str()
        ));
        CommittedDrop {
            card_id,
            from,
            to,
            batch,
        }
    }
}

impl<M: StageMap> Loggable for BoardEngine<M> {
    fn add_log(&mut self, message: String) {
        let entry = LogEntry::new(message);
        debug!(entry = %entry, "activity");
        self.logs.push(entry);
    }

    fn get_logs(&self) -> &[LogEntry] {
        &self.logs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Droppable, Point, Rect};
    use crate::entities::{
        DealStage, Deals, InitiativeColumn, InitiativeStatus, Initiatives, TaskStatus, Tasks,
    };
    use crate::gate::MockTransitionGate;
    use serde_json::json;

    fn id(s: &str) -> CardId {
        CardId::from(s)
    }

    fn snapshot<M: StageMap>(engine: &BoardEngine<M>) -> Vec<(String, M::Status, u32)> {
        engine
            .board()
            .cards()
            .iter()
            .map(|c| (c.id.to_string(), c.status, c.position))
            .collect()
    }

    /// X = TODO holds A, B; Y = IN_PROGRESS holds C.
    fn scenario() -> BoardEngine<Tasks> {
        BoardEngine::new(vec![
            Card::new("A", TaskStatus::Todo, 0),
            Card::new("B", TaskStatus::Todo, 1),
            Card::new("C", TaskStatus::InProgress, 0),
        ])
    }

    fn deals() -> BoardEngine<Deals> {
        BoardEngine::new(vec![
            Card::new("d1", DealStage::Negotiation, 0),
            Card::new("d2", DealStage::Negotiation, 1),
            Card::new("l1", DealStage::Lost, 0),
        ])
    }

    fn assert_dense<M: StageMap>(engine: &BoardEngine<M>) {
        for column in M::Column::all() {
            assert!(
                engine.board().is_dense(*column),
                "column {} is not dense",
                column.as_str()
            );
        }
    }

    // --- concrete scenarios ---

    #[test]
    fn drop_on_column_surface_appends_and_renumbers_both_columns() {
        let mut engine = scenario();
        engine.drag_start(&id("A")).unwrap();
        engine.drag_over(Some(&DropTarget::Column(TaskStatus::InProgress)));
        let outcome = engine.drag_end(Some(&DropTarget::Column(TaskStatus::InProgress)));

        assert!(matches!(outcome, DropOutcome::Committed(_)));
        let board = engine.board();
        assert_eq!(
            board.card(&id("A")).unwrap().status,
            TaskStatus::InProgress
        );
        assert_eq!(
            board.column_ids(TaskStatus::InProgress),
            vec![id("C"), id("A")]
        );
        assert_eq!(board.card(&id("A")).unwrap().position, 1);
        assert_eq!(board.column_ids(TaskStatus::Todo), vec![id("B")]);
        assert_eq!(board.card(&id("B")).unwrap().position, 0);
        assert_eq!(engine.phase(), DragPhase::Idle);
    }

    #[test]
    fn drop_outside_restores_everything() {
        let mut engine = scenario();
        let before = snapshot(&engine);

        engine.drag_start(&id("A")).unwrap();
        engine.drag_over(Some(&DropTarget::Column(TaskStatus::InProgress)));
        assert_eq!(
            engine.board().card(&id("A")).unwrap().status,
            TaskStatus::InProgress
        );

        assert!(matches!(engine.drag_end(None), DropOutcome::Cancelled));
        assert_eq!(snapshot(&engine), before);
        assert!(engine.session().is_none());
    }

    // --- drag-over ---

    #[test]
    fn drag_over_previews_status_without_touching_positions() {
        let mut engine = scenario();
        engine.drag_start(&id("B")).unwrap();

        let column = engine.drag_over(Some(&DropTarget::Card(id("C"))));
        assert_eq!(column, Some(TaskStatus::InProgress));

        let b = engine.board().card(&id("B")).unwrap();
        assert_eq!(b.status, TaskStatus::InProgress);
        assert_eq!(b.position, 1);
        assert_eq!(
            engine.session().unwrap().original_status,
            TaskStatus::Todo
        );
    }

    #[test]
    fn drag_over_within_multi_status_column_keeps_status() {
        let mut engine = BoardEngine::<Initiatives>::new(vec![
            Card::new("i1", InitiativeStatus::AtRisk, 0),
            Card::new("i2", InitiativeStatus::OnHold, 1),
        ]);
        engine.drag_start(&id("i1")).unwrap();
        engine.drag_over(Some(&DropTarget::Column(InitiativeColumn::NeedsAttention)));

        assert_eq!(
            engine.board().card(&id("i1")).unwrap().status,
            InitiativeStatus::AtRisk
        );
    }

    #[test]
    fn drag_over_nothing_is_a_no_op() {
        let mut engine = scenario();
        engine.drag_start(&id("A")).unwrap();
        assert_eq!(engine.drag_over(None), None);
        assert_eq!(
            engine.board().card(&id("A")).unwrap().status,
            TaskStatus::Todo
        );
    }

    // --- status mapping ---

    #[test]
    fn surface_drop_always_sets_primary_status() {
        let mut engine = BoardEngine::<Initiatives>::new(vec![
            Card::new("i1", InitiativeStatus::Cancelled, 0),
            Card::new("i2", InitiativeStatus::AtRisk, 0),
        ]);

        engine.drag_start(&id("i1")).unwrap();
        engine.drag_end(Some(&DropTarget::Column(InitiativeColumn::NeedsAttention)));
        assert_eq!(
            engine.board().card(&id("i1")).unwrap().status,
            InitiativeStatus::OnHold
        );

        engine.drag_start(&id("i2")).unwrap();
        engine.drag_end(Some(&DropTarget::Column(InitiativeColumn::Done)));
        assert_eq!(
            engine.board().card(&id("i2")).unwrap().status,
            InitiativeStatus::Completed
        );
        assert_dense(&engine);
    }

    #[test]
    fn same_column_reorder_is_an_array_move() {
        let mut engine = BoardEngine::<Tasks>::new(vec![
            Card::new("a", TaskStatus::Todo, 0),
            Card::new("b", TaskStatus::Todo, 1),
            Card::new("c", TaskStatus::Todo, 2),
            Card::new("d", TaskStatus::Todo, 3),
        ]);

        engine.drag_start(&id("d")).unwrap();
        engine.drag_over(Some(&DropTarget::Card(id("b"))));
        let outcome = engine.drag_end(Some(&DropTarget::Card(id("b"))));

        let DropOutcome::Committed(drop) = outcome else {
            panic!("expected a commit");
        };
        assert_eq!(drop.from, drop.to);
        assert_eq!(
            engine.board().column_ids(TaskStatus::Todo),
            vec![id("a"), id("d"), id("b"), id("c")]
        );
        assert!(engine
            .board()
            .cards()
            .iter()
            .all(|c| c.status == TaskStatus::Todo));
    }

    #[test]
    fn cross_column_drop_on_card_takes_its_index() {
        let mut engine = scenario();
        engine.drag_start(&id("B")).unwrap();
        engine.drag_over(Some(&DropTarget::Card(id("C"))));
        engine.drag_end(Some(&DropTarget::Card(id("C"))));

        assert_eq!(
            engine.board().column_ids(TaskStatus::InProgress),
            vec![id("B"), id("C")]
        );
        assert_eq!(engine.board().column_ids(TaskStatus::Todo), vec![id("A")]);
        assert_dense(&engine);
    }

    #[test]
    fn origin_gap_is_kept_when_renumbering_is_off() {
        let mut engine = scenario().with_options(EngineOptions {
            renumber_origin_column: false,
            ..Default::default()
        });
        engine.drag_start(&id("A")).unwrap();
        engine.drag_end(Some(&DropTarget::Column(TaskStatus::InProgress)));

        assert_eq!(engine.board().card(&id("B")).unwrap().position, 1);
        assert!(!engine.board().is_dense(TaskStatus::Todo));
    }

    #[test]
    fn positions_stay_dense_over_many_drops() {
        let mut engine = BoardEngine::<Tasks>::new(
            (0..9)
                .map(|i| {
                    let status = TaskStatus::all()[i % 3];
                    Card::new(format!("t{i}"), status, (i / 3) as u32)
                })
                .collect(),
        );

        let moves: Vec<(usize, DropTarget<TaskStatus>)> = vec![
            (0, DropTarget::Column(TaskStatus::Done)),
            (4, DropTarget::Card(id("t2"))),
            (8, DropTarget::Card(id("t0"))),
            (3, DropTarget::Column(TaskStatus::Todo)),
            (5, DropTarget::Card(id("t1"))),
            (1, DropTarget::Card(id("t4"))),
            (7, DropTarget::Column(TaskStatus::InProgress)),
            (6, DropTarget::Card(id("t6"))),
        ];
        for (card, target) in moves {
            let card = id(&format!("t{card}"));
            engine.drag_start(&card).unwrap();
            engine.drag_over(Some(&target));
            engine.drag_end(Some(&target));
            assert_dense(&engine);
        }
        assert_eq!(engine.board().len(), 9);
    }

    // --- gates ---

    #[test]
    fn gate_cancel_restores_status_and_positions() {
        let mut engine = deals();
        let before = snapshot(&engine);

        engine.drag_start(&id("d1")).unwrap();
        engine.drag_over(Some(&DropTarget::Column(DealStage::Lost)));
        let outcome = engine.drag_end(Some(&DropTarget::Column(DealStage::Lost)));

        let DropOutcome::AwaitingConfirmation(prompt) = outcome else {
            panic!("expected the lost gate");
        };
        assert_eq!(prompt.title, "Deal Lost");
        assert_eq!(prompt.field, "lost_reason");
        assert_eq!(engine.phase(), DragPhase::AwaitingGate);
        assert_eq!(
            engine.board().card(&id("d1")).unwrap().status,
            DealStage::Lost
        );

        engine.cancel_gate().unwrap();
        assert_eq!(snapshot(&engine), before);
        assert_eq!(engine.phase(), DragPhase::Idle);
    }

    #[test]
    fn gate_confirm_merges_input_and_renumbers() {
        let mut engine = deals();
        engine.drag_start(&id("d1")).unwrap();
        engine.drag_end(Some(&DropTarget::Card(id("l1"))));

        let drop = engine.confirm_gate("  went with a competitor ").unwrap();

        let record = drop.batch.get(&id("d1")).unwrap();
        assert_eq!(record.status, DealStage::Lost);
        assert_eq!(record.fields["lost_reason"], json!("went with a competitor"));

        let board = engine.board();
        let d1 = board.card(&id("d1")).unwrap();
        assert_eq!(d1.status, DealStage::Lost);
        assert_eq!(d1.fields["lost_reason"], json!("went with a competitor"));
        assert_eq!(board.column_ids(DealStage::Lost), vec![id("d1"), id("l1")]);
        assert_eq!(board.column_ids(DealStage::Negotiation), vec![id("d2")]);
        assert_dense(&engine);
    }

    #[test]
    fn empty_gate_input_is_accepted_by_default() {
        let mut engine = deals();
        engine.drag_start(&id("d2")).unwrap();
        engine.drag_end(Some(&DropTarget::Column(DealStage::Lost)));

        let drop = engine.confirm_gate("").unwrap();
        assert_eq!(drop.batch.get(&id("d2")).unwrap().fields["lost_reason"], json!(""));
    }

    #[test]
    fn required_gate_input_keeps_transition_pending() {
        let mut engine = deals().with_options(EngineOptions {
            require_gate_input: true,
            ..Default::default()
        });
        engine.drag_start(&id("d2")).unwrap();
        engine.drag_end(Some(&DropTarget::Column(DealStage::Lost)));

        assert!(matches!(
            engine.confirm_gate("   "),
            Err(BoardError::Validation(_))
        ));
        assert_eq!(engine.phase(), DragPhase::AwaitingGate);
        assert!(engine.confirm_gate("budget").is_ok());
    }

    #[test]
    fn reordering_inside_a_gated_column_skips_the_gate() {
        let mut engine = BoardEngine::<Deals>::new(vec![
            Card::new("l1", DealStage::Lost, 0),
            Card::new("l2", DealStage::Lost, 1),
        ]);
        engine.drag_start(&id("l2")).unwrap();
        let outcome = engine.drag_end(Some(&DropTarget::Card(id("l1"))));

        assert!(matches!(outcome, DropOutcome::Committed(_)));
        assert_eq!(
            engine.board().column_ids(DealStage::Lost),
            vec![id("l2"), id("l1")]
        );
    }

    #[test]
    fn gates_are_only_consulted_for_cross_column_moves() {
        let mut gate = MockTransitionGate::<TaskStatus>::new();
        gate.expect_requires_confirmation()
            .withf(|from, to| *from == TaskStatus::Todo && *to == TaskStatus::Done)
            .times(1)
            .returning(|_, _| true);
        gate.expect_prompt().times(1).returning(|| GatePrompt {
            title: "Finish task".to_string(),
            description: "Add a note".to_string(),
            field: "note".to_string(),
        });

        let mut engine = scenario().with_gates(vec![Box::new(gate)]);

        engine.drag_start(&id("B")).unwrap();
        assert!(matches!(
            engine.drag_end(Some(&DropTarget::Card(id("A")))),
            DropOutcome::Committed(_)
        ));

        engine.drag_start(&id("A")).unwrap();
        let outcome = engine.drag_end(Some(&DropTarget::Column(TaskStatus::Done)));
        assert!(matches!(outcome, DropOutcome::AwaitingConfirmation(p) if p.field == "note"));
    }

    #[test]
    fn new_drags_are_refused_while_a_gate_is_pending() {
        let mut engine = deals();
        engine.drag_start(&id("d1")).unwrap();
        engine.drag_end(Some(&DropTarget::Column(DealStage::Lost)));

        assert!(matches!(
            engine.drag_start(&id("d2")),
            Err(BoardError::GatePending { .. })
        ));
        assert!(matches!(engine.drag_end(None), DropOutcome::Ignored));
        assert_eq!(engine.phase(), DragPhase::AwaitingGate);
    }

    #[test]
    fn gate_resolution_without_a_pending_transition_fails() {
        let mut engine = deals();
        assert!(matches!(
            engine.confirm_gate("x"),
            Err(BoardError::NoPendingTransition)
        ));
        assert!(matches!(
            engine.cancel_gate(),
            Err(BoardError::NoPendingTransition)
        ));
    }

    // --- session misuse and stale state ---

    #[test]
    fn only_one_session_at_a_time() {
        let mut engine = scenario();
        engine.drag_start(&id("A")).unwrap();
        assert!(matches!(
            engine.drag_start(&id("B")),
            Err(BoardError::SessionActive { card_id }) if card_id == "A"
        ));
    }

    #[test]
    fn unknown_card_cannot_start_a_drag() {
        let mut engine = scenario();
        assert!(matches!(
            engine.drag_start(&id("ghost")),
            Err(BoardError::NotFound(_))
        ));
        assert_eq!(engine.phase(), DragPhase::Idle);
    }

    #[test]
    fn card_removed_mid_drag_is_ignored() {
        let mut engine = scenario();
        engine.drag_start(&id("A")).unwrap();
        engine.remove_card(&id("A"));

        let outcome = engine.drag_end(Some(&DropTarget::Column(TaskStatus::InProgress)));
        assert!(matches!(outcome, DropOutcome::Ignored));
        assert_eq!(engine.phase(), DragPhase::Idle);
        assert_eq!(engine.board().column_ids(TaskStatus::Todo), vec![id("B")]);
    }

    #[test]
    fn stale_over_card_falls_back_to_current_column() {
        let mut engine = scenario();
        engine.drag_start(&id("A")).unwrap();
        let outcome = engine.drag_end(Some(&DropTarget::Card(id("vanished"))));

        assert!(matches!(outcome, DropOutcome::Committed(_)));
        assert_eq!(
            engine.board().column_ids(TaskStatus::Todo),
            vec![id("B"), id("A")]
        );
    }

    #[test]
    fn drag_end_without_session_is_ignored() {
        let mut engine = scenario();
        assert!(matches!(engine.drag_end(None), DropOutcome::Ignored));
    }

    #[test]
    fn drag_cancel_reverts_like_a_miss() {
        let mut engine = scenario();
        engine.drag_start(&id("A")).unwrap();
        engine.drag_over(Some(&DropTarget::Column(TaskStatus::Done)));
        assert!(matches!(engine.drag_cancel(), DropOutcome::Cancelled));
        assert_eq!(
            engine.board().card(&id("A")).unwrap().status,
            TaskStatus::Todo
        );
    }

    // --- geometry ---

    #[test]
    fn drag_move_resolves_collisions() {
        let mut engine = scenario();
        let droppables = vec![
            Droppable::new(
                DropTarget::Column(TaskStatus::Todo),
                Rect::new(0.0, 0.0, 200.0, 600.0),
            ),
            Droppable::new(
                DropTarget::Column(TaskStatus::InProgress),
                Rect::new(220.0, 0.0, 200.0, 600.0),
            ),
        ];

        engine.drag_start(&id("A")).unwrap();
        let target = engine.drag_move(&CollisionInput {
            pointer: Some(Point::new(300.0, 300.0)),
            dragged: Rect::new(250.0, 280.0, 180.0, 60.0),
            droppables: &droppables,
        });

        assert_eq!(target, Some(DropTarget::Column(TaskStatus::InProgress)));
        assert_eq!(
            engine.session().unwrap().over,
            Some(DropTarget::Column(TaskStatus::InProgress))
        );
        assert_eq!(
            engine.board().card(&id("A")).unwrap().status,
            TaskStatus::InProgress
        );
    }

    #[test]
    fn activity_log_records_the_gesture() {
        let mut engine = scenario();
        engine.drag_start(&id("A")).unwrap();
        engine.drag_end(Some(&DropTarget::Column(TaskStatus::Done)));

        let messages: Vec<_> = engine.get_logs().iter().map(|l| l.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Started dragging A from TODO", "Moved A from TODO to DONE"]
        );
    }

    #[test]
    fn collaborator_updates_reach_the_board() {
        let mut engine = scenario();
        engine.upsert_card(Card::new("D", TaskStatus::Done, 0));
        assert_eq!(
            engine.resolve_column(&DropTarget::Card(id("D"))),
            Some(TaskStatus::Done)
        );
        assert_eq!(
            engine.resolve_column(&DropTarget::Column(TaskStatus::Todo)),
            Some(TaskStatus::Todo)
        );

        assert!(engine.remove_card(&id("A")).is_some());
        assert_eq!(engine.resolve_column(&DropTarget::Card(id("A"))), None);
        assert_eq!(engine.board().card(&id("B")).unwrap().position, 1);
    }

    #[test]
    fn added_gate_holds_drops_into_its_column() {
        let mut engine = scenario();
        engine.add_gate(Box::new(crate::gate::ReasonGate::new(
            TaskStatus::Done,
            "completion_note",
        )));

        engine.drag_start(&id("C")).unwrap();
        let outcome = engine.drag_end(Some(&DropTarget::Column(TaskStatus::Done)));
        let DropOutcome::AwaitingConfirmation(prompt) = outcome else {
            panic!("expected a gate prompt");
        };
        assert_eq!(prompt.title, "Move to DONE");
        assert_eq!(prompt.field, "completion_note");

        let drop = engine.confirm_gate("shipped").unwrap();
        assert_eq!(
            drop.batch.get(&id("C")).unwrap().fields["completion_note"],
            json!("shipped")
        );
    }
}
