pub mod activation;
pub mod batch;
pub mod board;
pub mod card;
pub mod collision;
pub mod engine;
pub mod entities;
pub mod gate;
pub mod reorder;
pub mod session;
pub mod stage_map;

pub use activation::{ActivationConstraint, ActivationState, PendingActivation, SensorKind};
pub use batch::{ReorderBatch, ReorderUpdate};
pub use board::{BoardState, ColumnSummary};
pub use card::{Card, CardId};
pub use collision::{resolve_collision, CollisionInput, DropTarget, Droppable, Point, Rect};
pub use engine::{BoardEngine, CommittedDrop, DropOutcome, EngineOptions};
pub use entities::{
    DealStage, Deals, InitiativeColumn, InitiativeStatus, Initiatives, PotentialProjects,
    PotentialStage, ProjectStatus, Projects, TaskStatus, Tasks,
};
pub use gate::{GatePrompt, PendingTransition, ReasonGate, TransitionGate};
pub use reorder::Placement;
pub use session::{DragPhase, DragSession};
pub use stage_map::{columns, ColumnInfo, StageMap};
