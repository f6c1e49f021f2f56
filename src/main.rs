use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use estuary::app::AppContext;
use estuary::cli::{commands, Cli, Commands};
use estuary::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database = Some(db);
    }
    if let Some(workers) = cli.workers {
        config.update.workers = workers;
    }
    if let Commands::Generate(ref args) | Commands::Run(ref args) = cli.command {
        args.apply(&mut config);
    }
    config.validate()?;

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::AddFeed { url, author } => {
            commands::add_feed(&ctx, &url, author).await?;
        }
        Commands::Update => {
            commands::update_feeds(&ctx).await?;
        }
        Commands::Generate(args) => {
            commands::generate(&ctx, &args.output)?;
        }
        Commands::Run(args) => {
            commands::run(&ctx, &args.output).await?;
        }
        Commands::List => {
            commands::list_feeds(&ctx)?;
        }
    }

    Ok(())
}
