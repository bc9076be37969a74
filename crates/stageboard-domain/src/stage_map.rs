//! Static status-to-column configuration.
//!
//! Every entity (deals, initiatives, ...) implements [`StageMap`] on a marker
//! type. The mapping functions are exhaustive `match`es, so a status that
//! maps to no column is a compile error rather than a runtime surprise.

use crate::gate::TransitionGate;
use serde::Serialize;
use stageboard_core::{BoardError, BoardResult, StageKey};
use std::fmt::Debug;

pub trait StageMap: Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// The entity's closed status enumeration.
    type Status: StageKey;
    /// The visual columns of the entity's board.
    type Column: StageKey;

    /// Collection name used by stores, e.g. `"potential_projects"`.
    const ENTITY: &'static str;

    /// Route segment of the reorder endpoint, e.g. `"potential-projects"`.
    const ROUTE: &'static str;

    /// Key the reorder endpoint expects the status under (`"stage"` or `"status"`).
    const STATUS_KEY: &'static str = "status";

    /// Numeric display field summed per column, if the entity has one.
    const VALUE_FIELD: Option<&'static str> = None;

    /// The single column a status renders in.
    fn column_of(status: Self::Status) -> Self::Column;

    /// Status assigned to a card dropped on the column surface.
    fn primary_status_of(column: Self::Column) -> Self::Status;

    fn title_of(column: Self::Column) -> &'static str;

    /// Every status that renders in `column`, in enumeration order.
    fn statuses_of(column: Self::Column) -> Vec<Self::Status> {
        Self::Status::all()
            .iter()
            .copied()
            .filter(|status| Self::column_of(*status) == column)
            .collect()
    }

    /// Transition gates installed on a fresh board for this entity.
    fn default_gates() -> Vec<Box<dyn TransitionGate<Self::Column>>> {
        Vec::new()
    }
}

/// Serializable description of one column, for hosts that render boards.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct ColumnInfo<M: StageMap> {
    pub id: M::Column,
    pub title: &'static str,
    pub statuses: Vec<M::Status>,
    pub primary_status: M::Status,
}

/// Columns of `M` in display order.
pub fn columns<M: StageMap>() -> Vec<ColumnInfo<M>> {
    M::Column::all()
        .iter()
        .map(|column| ColumnInfo {
            id: *column,
            title: M::title_of(*column),
            statuses: M::statuses_of(*column),
            primary_status: M::primary_status_of(*column),
        })
        .collect()
}

/// Check the invariants the type system cannot: every column is non-empty
/// and its primary status actually maps back onto it.
pub fn validate<M: StageMap>() -> BoardResult<()> {
    for column in M::Column::all() {
        let statuses = M::statuses_of(*column);
        if statuses.is_empty() {
            return Err(BoardError::Validation(format!(
                "column {} has no statuses",
                column.as_str()
            )));
        }
        let primary = M::primary_status_of(*column);
        if M::column_of(primary) != *column {
            return Err(BoardError::Validation(format!(
                "primary status {} of column {} maps to {}",
                primary.as_str(),
                column.as_str(),
                M::column_of(primary).as_str()
            )));
        }
    }
    Ok(())
}
