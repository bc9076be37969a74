use crate::card::CardId;
use crate::collision::DropTarget;
use crate::stage_map::StageMap;
use serde::Serialize;

/// Coarse lifecycle of the engine, for hosts deciding whether to accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Dragging,
    /// A drop is held by a transition gate; new drags are refused.
    AwaitingGate,
}

/// One in-progress gesture.
#[derive(Debug, Clone)]
pub struct DragSession<M: StageMap> {
    pub card_id: CardId,
    /// Status the card had before the gesture began.
    pub original_status: M::Status,
    /// Last target reported by drag-over, if any.
    pub over: Option<DropTarget<M::Column>>,
}

impl<M: StageMap> DragSession<M> {
    pub fn new(card_id: CardId, original_status: M::Status) -> Self {
        Self {
            card_id,
            original_status,
            over: None,
        }
    }

    pub fn origin_column(&self) -> M::Column {
        M::column_of(self.original_status)
    }
}
