mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use handlers::for_entity;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("STAGEBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::output_error(&format!("{e:#}"));
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "stageboard",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let file = cli
        .file
        .ok_or_else(|| anyhow::anyhow!("--file is required (or set STAGEBOARD_FILE)"))?;
    let ctx = CliContext::new(file, cli.config, cli.endpoint, cli.verbose);

    match cli.command {
        Commands::Show(args) => {
            use handlers::show::handle;
            for_entity!(args.entity, handle(&ctx))?;
        }
        Commands::Move(args) => {
            use handlers::moves::handle_move;
            for_entity!(args.entity, handle_move(&ctx, &args))?;
        }
        Commands::DropOutside(args) => {
            use handlers::moves::handle_drop_outside;
            for_entity!(args.entity, handle_drop_outside(&ctx, &args))?;
        }
        Commands::Replay(args) => {
            use handlers::replay::handle;
            for_entity!(args.entity, handle(&ctx, &args))?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
