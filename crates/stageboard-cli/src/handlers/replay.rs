//! Replay of recorded gestures.
//!
//! A script lists the droppable regions as they were laid out on screen,
//! the dragged card's starting rectangle and a sequence of press/move/release
//! samples. The samples go through the sensor's activation constraint and
//! the collision resolver exactly as live input would.

use crate::cli::ReplayArgs;
use crate::context::CliContext;
use crate::handlers::moves::{DropReport, GateDecision};
use crate::output;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use stageboard_domain::{
    resolve_collision, ActivationConstraint, ActivationState, CardId, CollisionInput,
    DropTarget, Droppable, PendingActivation, Point, Rect, SensorKind, StageMap,
};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    Down { x: f64, y: f64, t: u64 },
    Move { x: f64, y: f64, t: u64 },
    Up { x: f64, y: f64, t: u64 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptGate {
    Confirm(String),
    Cancel,
}

#[derive(Debug, Deserialize)]
pub struct GestureScript<C> {
    pub sensor: SensorKind,
    pub card: CardId,
    pub dragged_rect: Rect,
    pub droppables: Vec<Droppable<C>>,
    pub events: Vec<GestureEvent>,
    #[serde(default)]
    pub gate: Option<ScriptGate>,
}

#[derive(Serialize)]
#[serde(bound = "")]
struct ReplayView<M: StageMap> {
    activated: bool,
    /// Target resolved after each sample while dragging.
    trace: Vec<Option<DropTarget<M::Column>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<DropReport<M>>,
}

fn collision_input<'a, C>(
    script: &'a GestureScript<C>,
    origin: Point,
    point: Point,
) -> CollisionInput<'a, C> {
    let pointer = match script.sensor {
        SensorKind::Keyboard => None,
        _ => Some(point),
    };
    CollisionInput {
        pointer,
        dragged: script
            .dragged_rect
            .translate(point.x - origin.x, point.y - origin.y),
        droppables: &script.droppables,
    }
}

pub async fn handle<M: StageMap>(ctx: &CliContext, args: &ReplayArgs) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("reading {}", args.script.display()))?;
    let script: GestureScript<M::Column> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", args.script.display()))?;

    let mut board = ctx.synced_board::<M>().await?;
    let constraint = ActivationConstraint::for_sensor(script.sensor, &ctx.config);

    let mut pending: Option<PendingActivation> = None;
    let mut started = false;
    let mut trace = Vec::new();
    let mut outcome = None;

    for event in &script.events {
        match *event {
            GestureEvent::Down { x, y, t } => {
                if pending.is_some() {
                    bail!("second press before release");
                }
                let activation = PendingActivation::new(constraint, Point::new(x, y), t);
                if activation.state() == ActivationState::Activated {
                    board.drag_start(&script.card)?;
                    started = true;
                }
                pending = Some(activation);
            }
            GestureEvent::Move { x, y, t } => {
                let Some(activation) = pending.as_mut() else {
                    continue;
                };
                let point = Point::new(x, y);
                if !started {
                    match activation.update(point, t) {
                        ActivationState::Activated => {
                            board.drag_start(&script.card)?;
                            started = true;
                        }
                        ActivationState::Aborted => break,
                        ActivationState::Pending => continue,
                    }
                }
                let input = collision_input(&script, activation.origin(), point);
                trace.push(board.engine_mut().drag_move(&input));
            }
            GestureEvent::Up { x, y, .. } => {
                let Some(activation) = pending.take() else {
                    continue;
                };
                if !started {
                    break;
                }
                let input = collision_input(&script, activation.origin(), Point::new(x, y));
                let target = resolve_collision(&input);
                board.drag_over(target.as_ref());
                trace.push(target.clone());
                outcome = Some(board.drag_end(target.as_ref()));
                break;
            }
        }
    }

    // A gesture that never released counts as a cancel.
    if started && outcome.is_none() {
        outcome = Some(board.drag_end(None));
    }

    let decision = match &script.gate {
        Some(ScriptGate::Confirm(input)) => GateDecision::Confirm(input.clone()),
        _ => GateDecision::Cancel,
    };
    let result = match outcome {
        Some(outcome) => Some(DropReport::settle(ctx, &mut board, outcome, decision).await?),
        None => None,
    };

    output::output_success(ReplayView::<M> {
        activated: started,
        trace,
        result,
    });
    Ok(())
}
