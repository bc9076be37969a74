//! Sensor activation constraints.
//!
//! A press only becomes a drag once the gesture clears its sensor's
//! threshold, so that clicks and scrolls on a card do not start a session.

use crate::collision::Point;
use serde::{Deserialize, Serialize};
use stageboard_core::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Pointer,
    Touch,
    Keyboard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationConstraint {
    /// Activate once the pointer has moved `distance` px from the press.
    Distance { distance: f64 },
    /// Activate after `delay_ms` held within `tolerance` px.
    Delay { delay_ms: u64, tolerance: f64 },
    Immediate,
}

impl ActivationConstraint {
    pub fn for_sensor(kind: SensorKind, config: &AppConfig) -> Self {
        match kind {
            SensorKind::Pointer => ActivationConstraint::Distance {
                distance: config.effective_pointer_activation_distance(),
            },
            SensorKind::Touch => ActivationConstraint::Delay {
                delay_ms: config.effective_touch_activation_delay_ms(),
                tolerance: config.effective_touch_activation_tolerance(),
            },
            SensorKind::Keyboard => ActivationConstraint::Immediate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    Pending,
    Activated,
    Aborted,
}

/// A press that has not yet turned into a drag.
#[derive(Debug, Clone)]
pub struct PendingActivation {
    constraint: ActivationConstraint,
    origin: Point,
    pressed_at_ms: u64,
    state: ActivationState,
}

impl PendingActivation {
    pub fn new(constraint: ActivationConstraint, origin: Point, pressed_at_ms: u64) -> Self {
        let state = match constraint {
            ActivationConstraint::Immediate => ActivationState::Activated,
            _ => ActivationState::Pending,
        };
        Self {
            constraint,
            origin,
            pressed_at_ms,
            state,
        }
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Feed the latest sample. Once activated or aborted the state sticks.
    pub fn update(&mut self, point: Point, at_ms: u64) -> ActivationState {
        if self.state != ActivationState::Pending {
            return self.state;
        }
        let moved = self.origin.distance_to(point);
        self.state = match self.constraint {
            ActivationConstraint::Immediate => ActivationState::Activated,
            ActivationConstraint::Distance { distance } => {
                if moved >= distance {
                    ActivationState::Activated
                } else {
                    ActivationState::Pending
                }
            }
            ActivationConstraint::Delay {
                delay_ms,
                tolerance,
            } => {
                if moved > tolerance {
                    ActivationState::Aborted
                } else if at_ms.saturating_sub(self.pressed_at_ms) >= delay_ms {
                    ActivationState::Activated
                } else {
                    ActivationState::Pending
                }
            }
        };
        self.state
    }
}
