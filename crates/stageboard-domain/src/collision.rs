//! Collision resolution: which column or card a drag is currently over.

use crate::card::CardId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.left, self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }

    /// Shifted copy, used to follow a dragged card across the viewport.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Overlap area divided by the union area; `0.0` when disjoint.
    pub fn intersection_ratio(&self, other: &Rect) -> f64 {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left >= right || top >= bottom {
            return 0.0;
        }
        let overlap = (right - left) * (bottom - top);
        let union = self.area() + other.area() - overlap;
        if union <= 0.0 {
            return 0.0;
        }
        overlap / union
    }
}

/// The thing a card can be released over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DropTarget<C> {
    Column(C),
    Card(CardId),
}

impl<C> DropTarget<C> {
    pub fn is_column(&self) -> bool {
        matches!(self, DropTarget::Column(_))
    }

    pub fn is_card(&self) -> bool {
        matches!(self, DropTarget::Card(_))
    }
}

/// A registered drop region. Registration order breaks ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droppable<C> {
    pub target: DropTarget<C>,
    pub rect: Rect,
}

impl<C> Droppable<C> {
    pub fn new(target: DropTarget<C>, rect: Rect) -> Self {
        Self { target, rect }
    }
}

/// Geometry sampled at one moment of a drag.
#[derive(Debug, Clone)]
pub struct CollisionInput<'a, C> {
    /// `None` for keyboard drags, which have no pointer.
    pub pointer: Option<Point>,
    /// Current rectangle of the dragged card.
    pub dragged: Rect,
    pub droppables: &'a [Droppable<C>],
}

/// Regions containing the pointer, nearest (mean corner distance) first.
pub fn pointer_within<'a, C>(input: &CollisionInput<'a, C>) -> Vec<&'a Droppable<C>> {
    let Some(pointer) = input.pointer else {
        return Vec::new();
    };
    let mut hits: Vec<(f64, &Droppable<C>)> = input
        .droppables
        .iter()
        .filter(|d| d.rect.contains(pointer))
        .map(|d| {
            let mean = d
                .rect
                .corners()
                .iter()
                .map(|corner| pointer.distance_to(*corner))
                .sum::<f64>()
                / 4.0;
            (mean, d)
        })
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, d)| d).collect()
}

/// Regions overlapping the dragged rectangle, largest ratio first.
pub fn rect_intersection<'a, C>(input: &CollisionInput<'a, C>) -> Vec<&'a Droppable<C>> {
    let mut hits: Vec<(f64, &Droppable<C>)> = input
        .droppables
        .iter()
        .map(|d| (d.rect.intersection_ratio(&input.dragged), d))
        .filter(|(ratio, _)| *ratio > 0.0)
        .collect();
    hits.sort_by(|a, b| b.0.total_cmp(&a.0));
    hits.into_iter().map(|(_, d)| d).collect()
}

/// Pick the single target a drag is over.
///
/// A column containing the pointer wins outright. Failing that, the card
/// overlapping the dragged rectangle the most, then any overlapping region.
pub fn resolve_collision<C: Clone>(input: &CollisionInput<'_, C>) -> Option<DropTarget<C>> {
    if let Some(column) = pointer_within(input)
        .into_iter()
        .find(|d| d.target.is_column())
    {
        return Some(column.target.clone());
    }

    let intersecting = rect_intersection(input);
    if let Some(card) = intersecting.iter().find(|d| d.target.is_card()) {
        return Some(card.target.clone());
    }

    intersecting.first().map(|d| d.target.clone())
}
