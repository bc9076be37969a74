use super::stage_key;
use crate::stage_map::StageMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitiativeStatus {
    NotStarted,
    InProgress,
    OnHold,
    AtRisk,
    Completed,
    Cancelled,
}

stage_key!(InitiativeStatus {
    NotStarted => "NOT_STARTED",
    InProgress => "IN_PROGRESS",
    OnHold => "ON_HOLD",
    AtRisk => "AT_RISK",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

/// Six statuses consolidated into four columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitiativeColumn {
    ToDo,
    InProgress,
    NeedsAttention,
    Done,
}

stage_key!(InitiativeColumn {
    ToDo => "TO_DO",
    InProgress => "IN_PROGRESS",
    NeedsAttention => "NEEDS_ATTENTION",
    Done => "DONE",
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Initiatives;

impl StageMap for Initiatives {
    type Status = InitiativeStatus;
    type Column = InitiativeColumn;

    const ENTITY: &'static str = "initiatives";
    const ROUTE: &'static str = "initiatives";

    fn column_of(status: InitiativeStatus) -> InitiativeColumn {
        match status {
            InitiativeStatus::NotStarted => InitiativeColumn::ToDo,
            InitiativeStatus::InProgress => InitiativeColumn::InProgress,
            InitiativeStatus::OnHold | InitiativeStatus::AtRisk => {
                InitiativeColumn::NeedsAttention
            }
            InitiativeStatus::Completed | InitiativeStatus::Cancelled => InitiativeColumn::Done,
        }
    }

    fn primary_status_of(column: InitiativeColumn) -> InitiativeStatus {
        match column {
            InitiativeColumn::ToDo => InitiativeStatus::NotStarted,
            InitiativeColumn::InProgress => InitiativeStatus::InProgress,
            InitiativeColumn::NeedsAttention => InitiativeStatus::OnHold,
            InitiativeColumn::Done => InitiativeStatus::Completed,
        }
    }

    fn title_of(column: InitiativeColumn) -> &'static str {
        match column {
            InitiativeColumn::ToDo => "To Do",
            InitiativeColumn::InProgress => "In Progress",
            InitiativeColumn::NeedsAttention => "Needs Attention",
            InitiativeColumn::Done => "Done",
        }
    }
}
