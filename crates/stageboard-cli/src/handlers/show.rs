use crate::context::{column_views, CliContext, ColumnView};
use crate::output;
use serde::Serialize;
use stageboard_domain::StageMap;

#[derive(Serialize)]
#[serde(bound = "")]
struct BoardView<M: StageMap> {
    entity: &'static str,
    card_count: usize,
    columns: Vec<ColumnView<M>>,
}

pub async fn handle<M: StageMap>(ctx: &CliContext) -> anyhow::Result<()> {
    let engine = ctx.engine::<M>().await?;
    output::output_success(BoardView::<M> {
        entity: M::ENTITY,
        card_count: engine.board().len(),
        columns: column_views(&engine),
    });
    Ok(())
}
