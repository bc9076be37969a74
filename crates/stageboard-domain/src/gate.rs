//! Transition gates: per-column rules that hold a cross-column drop until the
//! user supplies extra input or cancels.

use crate::batch::ReorderBatch;
use crate::card::CardId;
use serde::Serialize;
use stageboard_core::{BoardError, BoardResult, StageKey};

/// What the host should ask the user while a transition is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatePrompt {
    pub title: String,
    pub description: String,
    /// Record field the confirmed input is merged into.
    pub field: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait TransitionGate<C: StageKey>: Send + Sync {
    /// Only consulted for genuine cross-column moves.
    fn requires_confirmation(&self, from: C, to: C) -> bool;

    fn prompt(&self) -> GatePrompt;
}

/// Gate that asks for a free-text reason whenever a card enters `column`.
#[derive(Debug, Clone)]
pub struct ReasonGate<C> {
    column: C,
    field: String,
    title: String,
    description: String,
}

impl<C: StageKey> ReasonGate<C> {
    pub fn new(column: C, field: impl Into<String>) -> Self {
        Self {
            column,
            field: field.into(),
            title: format!("Move to {}", column.as_str()),
            description: "Please provide a reason.".to_string(),
        }
    }

    pub fn with_prompt(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.title = title.into();
        self.description = description.into();
        self
    }
}

impl<C: StageKey> TransitionGate<C> for ReasonGate<C> {
    fn requires_confirmation(&self, from: C, to: C) -> bool {
        to == self.column && from != to
    }

    fn prompt(&self) -> GatePrompt {
        GatePrompt {
            title: self.title.clone(),
            description: self.description.clone(),
            field: self.field.clone(),
        }
    }
}

/// Trim gate input, optionally refusing an empty result.
pub fn normalize_gate_input(input: &str, require_non_empty: bool) -> BoardResult<String> {
    let trimmed = input.trim();
    if require_non_empty && trimmed.is_empty() {
        return Err(BoardError::Validation(
            "gate input must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// A computed-but-uncommitted drop waiting on a gate.
#[derive(Debug, Clone, Serialize)]
pub struct PendingTransition<S, C> {
    pub card_id: CardId,
    pub original_status: S,
    pub from: C,
    pub to: C,
    pub batch: ReorderBatch<S>,
    pub prompt: GatePrompt,
}
