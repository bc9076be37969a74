use super::stage_key;
use crate::stage_map::StageMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

stage_key!(ProjectStatus {
    Draft => "DRAFT",
    Active => "ACTIVE",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Projects;

impl StageMap for Projects {
    type Status = ProjectStatus;
    type Column = ProjectStatus;

    const ENTITY: &'static str = "projects";
    const ROUTE: &'static str = "projects";

    fn column_of(status: ProjectStatus) -> ProjectStatus {
        status
    }

    fn primary_status_of(column: ProjectStatus) -> ProjectStatus {
        column
    }

    fn title_of(column: ProjectStatus) -> &'static str {
        match column {
            ProjectStatus::Draft => "Draft",
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }
}
