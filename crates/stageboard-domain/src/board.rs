use crate::batch::ReorderBatch;
use crate::card::{Card, CardId};
use crate::stage_map::StageMap;
use serde::Serialize;
use stageboard_core::StageKey;
use std::marker::PhantomData;

/// In-memory ordered collection of cards for one entity's board.
///
/// Cards keep their load order; column order is always derived by sorting
/// on `position`, with load order breaking ties.
#[derive(Debug, Clone)]
pub struct BoardState<M: StageMap> {
    cards: Vec<Card<M::Status>>,
    _map: PhantomData<M>,
}

impl<M: StageMap> Default for BoardState<M> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Per-column aggregate shown in column headers.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct ColumnSummary<M: StageMap> {
    pub column: M::Column,
    pub title: &'static str,
    pub count: usize,
    pub total_value: f64,
}

impl<M: StageMap> BoardState<M> {
    pub fn new(cards: Vec<Card<M::Status>>) -> Self {
        Self {
            cards,
            _map: PhantomData,
        }
    }

    /// Replace the whole board, as after a full reload from the server.
    pub fn load(&mut self, cards: Vec<Card<M::Status>>) {
        self.cards = cards;
    }

    pub fn cards(&self) -> &[Card<M::Status>] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, id: &CardId) -> Option<&Card<M::Status>> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.card(id).is_some()
    }

    pub fn column_of_card(&self, id: &CardId) -> Option<M::Column> {
        self.card(id).map(|c| M::column_of(c.status))
    }

    /// Cards rendered in `column`, in display order.
    pub fn column_cards(&self, column: M::Column) -> Vec<&Card<M::Status>> {
        let mut cards: Vec<_> = self
            .cards
            .iter()
            .filter(|c| M::column_of(c.status) == column)
            .collect();
        cards.sort_by_key(|c| c.position);
        cards
    }

    pub fn column_ids(&self, column: M::Column) -> Vec<CardId> {
        self.column_cards(column)
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    }

    /// Overwrite a card's status. Returns `false` if the card is gone.
    pub fn set_status(&mut self, id: &CardId, status: M::Status) -> bool {
        match self.cards.iter_mut().find(|c| &c.id == id) {
            Some(card) => {
                card.status = status;
                true
            }
            None => false,
        }
    }

    /// Apply finalized records. Ids no longer on the board are skipped.
    pub fn apply_batch(&mut self, batch: &ReorderBatch<M::Status>) {
        for update in batch.iter() {
            if let Some(card) = self.cards.iter_mut().find(|c| c.id == update.id) {
                card.position = update.position;
                card.status = update.status;
                for (key, value) in &update.fields {
                    card.fields.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Insert a card created elsewhere, or replace the one with the same id.
    pub fn upsert(&mut self, card: Card<M::Status>) {
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    pub fn remove(&mut self, id: &CardId) -> Option<Card<M::Status>> {
        let index = self.cards.iter().position(|c| &c.id == id)?;
        Some(self.cards.remove(index))
    }

    /// Whether `column` holds exactly the positions `0..n`.
    pub fn is_dense(&self, column: M::Column) -> bool {
        self.column_cards(column)
            .iter()
            .enumerate()
            .all(|(index, card)| card.position as usize == index)
    }

    pub fn summaries(&self) -> Vec<ColumnSummary<M>> {
        M::Column::all()
            .iter()
            .map(|column| {
                let cards = self.column_cards(*column);
                let total_value = match M::VALUE_FIELD {
                    Some(field) => cards.iter().map(|c| c.numeric_field(field)).sum(),
                    None => 0.0,
                };
                ColumnSummary {
                    column: *column,
                    title: M::title_of(*column),
                    count: cards.len(),
                    total_value,
                }
            })
            .collect()
    }
}
