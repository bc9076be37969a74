use super::stage_key;
use crate::stage_map::StageMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PotentialStage {
    Potential,
    Confirmed,
    Cancelled,
}

stage_key!(PotentialStage {
    Potential => "POTENTIAL",
    Confirmed => "CONFIRMED",
    Cancelled => "CANCELLED",
});

#[derive(Debug, Clone, Copy, Default)]
pub struct PotentialProjects;

impl StageMap for PotentialProjects {
    type Status = PotentialStage;
    type Column = PotentialStage;

    const ENTITY: &'static str = "potential_projects";
    const ROUTE: &'static str = "potential-projects";
    const STATUS_KEY: &'static str = "stage";
    const VALUE_FIELD: Option<&'static str> = Some("estimated_value");

    fn column_of(status: PotentialStage) -> PotentialStage {
        status
    }

    fn primary_status_of(column: PotentialStage) -> PotentialStage {
        column
    }

    fn title_of(column: PotentialStage) -> &'static str {
        match column {
            PotentialStage::Potential => "Potential",
            PotentialStage::Confirmed => "Confirmed",
            PotentialStage::Cancelled => "Cancelled",
        }
    }
}
