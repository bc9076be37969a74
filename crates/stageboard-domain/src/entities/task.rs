use super::stage_key;
use crate::stage_map::StageMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

stage_key!(TaskStatus {
    Todo => "TODO",
    InProgress => "IN_PROGRESS",
    Done => "DONE",
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Tasks;

impl StageMap for Tasks {
    type Status = TaskStatus;
    type Column = TaskStatus;

    const ENTITY: &'static str = "tasks";
    const ROUTE: &'static str = "tasks";

    fn column_of(status: TaskStatus) -> TaskStatus {
        status
    }

    fn primary_status_of(column: TaskStatus) -> TaskStatus {
        column
    }

    fn title_of(column: TaskStatus) -> &'static str {
        match column {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}
