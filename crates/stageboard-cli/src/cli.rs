use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stageboard")]
#[command(about = "Drive drag-and-drop stage boards from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board file (or set STAGEBOARD_FILE env var)
    #[arg(long, short, global = true, value_name = "FILE", env = "STAGEBOARD_FILE")]
    pub file: Option<PathBuf>,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Submit batches to this server instead of writing the board file
    #[arg(long, global = true, value_name = "URL", env = "STAGEBOARD_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Include the engine's activity log in the output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show an entity's board: columns, cards in position order, totals
    Show(EntityArgs),
    /// Drag a card and release it over a column or another card
    Move(MoveArgs),
    /// Drag a card and release it outside every column
    DropOutside(DropOutsideArgs),
    /// Replay a recorded gesture script through the collision resolver
    Replay(ReplayArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Deals,
    PotentialProjects,
    Initiatives,
    Tasks,
    Projects,
}

#[derive(Args)]
pub struct EntityArgs {
    #[arg(long, value_enum)]
    pub entity: EntityKind,
}

#[derive(Args)]
pub struct MoveArgs {
    #[arg(long, value_enum)]
    pub entity: EntityKind,
    /// Card to drag
    #[arg(long)]
    pub card: String,
    /// Release over this column's surface (e.g. NEEDS_ATTENTION)
    #[arg(long, conflicts_with = "onto", required_unless_present = "onto")]
    pub column: Option<String>,
    /// Release over this card
    #[arg(long)]
    pub onto: Option<String>,
    /// Confirm a gated move with this input (e.g. a lost reason)
    #[arg(long, conflicts_with = "cancel_gate")]
    pub reason: Option<String>,
    /// Cancel a gated move instead of confirming it
    #[arg(long)]
    pub cancel_gate: bool,
}

#[derive(Args)]
pub struct DropOutsideArgs {
    #[arg(long, value_enum)]
    pub entity: EntityKind,
    #[arg(long)]
    pub card: String,
}

#[derive(Args)]
pub struct ReplayArgs {
    #[arg(long, value_enum)]
    pub entity: EntityKind,
    /// JSON gesture script
    #[arg(long)]
    pub script: PathBuf,
}
