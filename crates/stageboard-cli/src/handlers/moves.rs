use crate::cli::{DropOutsideArgs, MoveArgs};
use crate::context::{activity_log, column_views, CliContext, ColumnView};
use crate::output;
use anyhow::{anyhow, bail};
use serde::Serialize;
use stageboard_core::{LogEntry, StageKey};
use stageboard_domain::{CardId, DropOutcome, DropTarget, GatePrompt, StageMap};
use stageboard_persistence::{ReconcileOutcome, SyncedBoard};

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateResolution {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Serialize)]
pub struct GateReport {
    pub prompt: GatePrompt,
    pub resolution: GateResolution,
}

/// How to answer a gate if the drop hits one.
#[derive(Debug, Clone)]
pub enum GateDecision {
    Confirm(String),
    Cancel,
}

impl GateDecision {
    pub fn from_flags(reason: Option<&str>, cancel: bool) -> Self {
        match (reason, cancel) {
            (Some(reason), false) => GateDecision::Confirm(reason.to_string()),
            _ => GateDecision::Cancel,
        }
    }
}

#[derive(Serialize)]
#[serde(bound = "")]
pub struct DropReport<M: StageMap> {
    pub outcome: DropOutcome<M>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateReport>,
    pub persistence: Vec<ReconcileOutcome>,
    pub columns: Vec<ColumnView<M>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<LogEntry>>,
}

impl<M: StageMap> DropReport<M> {
    /// Answer any pending gate, wait for persistence and snapshot the board.
    pub async fn settle(
        ctx: &CliContext,
        board: &mut SyncedBoard<M>,
        outcome: DropOutcome<M>,
        decision: GateDecision,
    ) -> anyhow::Result<Self> {
        let (outcome, gate) = match outcome {
            DropOutcome::AwaitingConfirmation(prompt) => match decision {
                GateDecision::Confirm(input) => {
                    let drop = board.confirm_gate(&input)?;
                    (
                        DropOutcome::Committed(drop),
                        Some(GateReport {
                            prompt,
                            resolution: GateResolution::Confirmed,
                        }),
                    )
                }
                GateDecision::Cancel => {
                    board.cancel_gate()?;
                    (
                        DropOutcome::Cancelled,
                        Some(GateReport {
                            prompt,
                            resolution: GateResolution::Cancelled,
                        }),
                    )
                }
            },
            other => (other, None),
        };

        let persistence = board.flush().await;
        Ok(Self {
            outcome,
            gate,
            persistence,
            columns: column_views(board.engine()),
            logs: activity_log(ctx, board.engine()),
        })
    }
}

fn parse_target<M: StageMap>(
    board: &SyncedBoard<M>,
    column: Option<&str>,
    onto: Option<&str>,
) -> anyhow::Result<DropTarget<M::Column>> {
    match (column, onto) {
        (Some(name), _) => M::Column::parse(name).map(DropTarget::Column).ok_or_else(|| {
            let known: Vec<_> = M::Column::all().iter().map(|c| c.as_str()).collect();
            anyhow!(
                "Unknown column '{}' for {}; expected one of: {}",
                name,
                M::ENTITY,
                known.join(", ")
            )
        }),
        (None, Some(id)) => {
            let id = CardId::from(id);
            if !board.engine().board().contains(&id) {
                bail!("Card not found: {}", id);
            }
            Ok(DropTarget::Card(id))
        }
        (None, None) => bail!("Either --column or --onto is required"),
    }
}

pub async fn handle_move<M: StageMap>(ctx: &CliContext, args: &MoveArgs) -> anyhow::Result<()> {
    let mut board = ctx.synced_board::<M>().await?;
    let target = parse_target(&board, args.column.as_deref(), args.onto.as_deref())?;
    let card = CardId::from(args.card.as_str());

    board.drag_start(&card)?;
    board.drag_over(Some(&target));
    let outcome = board.drag_end(Some(&target));

    let decision = GateDecision::from_flags(args.reason.as_deref(), args.cancel_gate);
    let report = DropReport::settle(ctx, &mut board, outcome, decision).await?;
    output::output_success(report);
    Ok(())
}

pub async fn handle_drop_outside<M: StageMap>(
    ctx: &CliContext,
    args: &DropOutsideArgs,
) -> anyhow::Result<()> {
    let mut board = ctx.synced_board::<M>().await?;
    let card = CardId::from(args.card.as_str());

    board.drag_start(&card)?;
    let outcome = board.drag_end(None);

    let report = DropReport::settle(ctx, &mut board, outcome, GateDecision::Cancel).await?;
    output::output_success(report);
    Ok(())
}
