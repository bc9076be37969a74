//! Position reconciliation.
//!
//! Pure functions that turn "card X was released over target Y" into the
//! finalized per-column ordering. Nothing here mutates board state; the
//! engine applies the resulting batch (immediately or after a gate).

use crate::batch::{ReorderBatch, ReorderUpdate};
use crate::card::{Card, CardId};
use crate::stage_map::StageMap;

/// Where inside the target column the dragged card lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Released over a sibling card: take that card's index.
    OnCard(CardId),
    /// Released over the column surface: append.
    End,
}

/// Move the element at `from` so it ends up at index `to`.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Count cards in a column and return the next append position.
pub fn next_position_in_column<M: StageMap>(cards: &[Card<M::Status>], column: M::Column) -> u32 {
    cards
        .iter()
        .filter(|c| M::column_of(c.status) == column)
        .count() as u32
}

/// Compute the batch for dropping `dragged` into `target`.
///
/// Column membership of the dragged card is judged by `original_status`,
/// not by whatever optimistic status drag-over gave it, so a same-column
/// drop is an exact array move and a cross-column drop inserts before the
/// card it was released over.
///
/// The dragged card takes the target's primary status unless it was
/// reordered onto a sibling inside its own column, in which case its status
/// is left alone. Resetting it to the primary status as well would turn an
/// AT_RISK initiative reordered inside NEEDS_ATTENTION into ON_HOLD; it
/// stays AT_RISK instead.
///
/// When `renumber_origin` is set and the card changed columns, the column it
/// left is compacted and appended to the batch.
///
/// Returns `None` if `dragged` is not on the board.
pub fn plan_drop<M: StageMap>(
    cards: &[Card<M::Status>],
    dragged: &CardId,
    original_status: M::Status,
    target: M::Column,
    placement: &Placement,
    renumber_origin: bool,
) -> Option<ReorderBatch<M::Status>> {
    let dragged_card = cards.iter().find(|c| &c.id == dragged)?;
    let origin = M::column_of(original_status);
    let effective_status = |card: &Card<M::Status>| {
        if &card.id == dragged {
            original_status
        } else {
            card.status
        }
    };

    let mut order = column_members::<M>(cards, target, &effective_status);
    let current_index = order.iter().position(|c| &c.id == dragged);

    match placement {
        Placement::OnCard(over) => {
            let over_index = order.iter().position(|c| &c.id == over);
            match (current_index, over_index) {
                (Some(from), Some(to)) => array_move(&mut order, from, to),
                (None, Some(to)) => order.insert(to, dragged_card),
                (Some(from), None) => array_move(&mut order, from, usize::MAX),
                (None, None) => order.push(dragged_card),
            }
        }
        Placement::End => match current_index {
            Some(from) => array_move(&mut order, from, usize::MAX),
            None => order.push(dragged_card),
        },
    }

    // Sibling reorder inside the origin column keeps a secondary status.
    let dragged_status = match placement {
        Placement::OnCard(_) if origin == target => original_status,
        _ => M::primary_status_of(target),
    };

    let mut updates: Vec<_> = order
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let status = if &card.id == dragged {
                dragged_status
            } else {
                card.status
            };
            ReorderUpdate::new(card.id.clone(), index as u32, status)
        })
        .collect();

    if renumber_origin && origin != target {
        let remaining = column_members::<M>(cards, origin, &effective_status);
        updates.extend(
            remaining
                .iter()
                .filter(|c| &c.id != dragged)
                .enumerate()
                .map(|(index, card)| {
                    ReorderUpdate::new(card.id.clone(), index as u32, card.status)
                }),
        );
    }

    Some(ReorderBatch::new(updates))
}

fn column_members<'a, M: StageMap>(
    cards: &'a [Card<M::Status>],
    column: M::Column,
    effective_status: &impl Fn(&Card<M::Status>) -> M::Status,
) -> Vec<&'a Card<M::Status>> {
    let mut members: Vec<_> = cards
        .iter()
        .filter(|c| M::column_of(effective_status(c)) == column)
        .collect();
    members.sort_by_key(|c| c.position);
    members
}
