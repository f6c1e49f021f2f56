pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "estuary")]
#[command(about = "Aggregate RSS/Atom feeds into a static website", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/estuary/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database, overriding the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Number of feeds updated concurrently
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to a feed and store its current posts
    AddFeed {
        /// URL of the feed to add
        url: String,

        /// Author name used for posts that don't name one
        #[arg(short, long)]
        author: Option<String>,
    },
    /// Update all enabled feeds
    Update,
    /// Generate the website from stored posts
    Generate(GenerateArgs),
    /// Update all enabled feeds, then generate the website
    Run(GenerateArgs),
    /// List feeds with their post counts
    List,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Output directory; its previous content is removed
    pub output: PathBuf,

    /// Directory holding the static assets directory
    #[arg(long)]
    pub share_dir: Option<PathBuf>,

    /// Analytics tracking id embedded in every page
    #[arg(long)]
    pub analytics_id: Option<String>,
}

impl GenerateArgs {
    /// Apply these options on top of the loaded configuration.
    pub fn apply(&self, config: &mut crate::config::Config) {
        if let Some(ref dir) = self.share_dir {
            config.generator.share_dir = dir.clone();
        }
        if let Some(ref id) = self.analytics_id {
            config.site.analytics_id = Some(id.clone());
        }
    }
}
