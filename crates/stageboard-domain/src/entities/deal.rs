use super::stage_key;
use crate::gate::{ReasonGate, TransitionGate};
use crate::stage_map::StageMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

stage_key!(DealStage {
    Lead => "LEAD",
    Qualified => "QUALIFIED",
    Proposal => "PROPOSAL",
    Negotiation => "NEGOTIATION",
    Won => "WON",
    Lost => "LOST",
});

/// Sales pipeline. One column per stage; losing a deal asks for a reason.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deals;

impl StageMap for Deals {
    type Status = DealStage;
    type Column = DealStage;

    const ENTITY: &'static str = "deals";
    const ROUTE: &'static str = "deals";
    const STATUS_KEY: &'static str = "stage";
    const VALUE_FIELD: Option<&'static str> = Some("value");

    fn column_of(status: DealStage) -> DealStage {
        status
    }

    fn primary_status_of(column: DealStage) -> DealStage {
        column
    }

    fn title_of(column: DealStage) -> &'static str {
        match column {
            DealStage::Lead => "Lead",
            DealStage::Qualified => "Qualified",
            DealStage::Proposal => "Proposal",
            DealStage::Negotiation => "Negotiation",
            DealStage::Won => "Won",
            DealStage::Lost => "Lost",
        }
    }

    fn default_gates() -> Vec<Box<dyn TransitionGate<DealStage>>> {
        vec![Box::new(
            ReasonGate::new(DealStage::Lost, "lost_reason").with_prompt(
                "Deal Lost",
                "Please provide a reason for marking this deal as lost.",
            ),
        )]
    }
}
