//! `assetq` - query asset-search engines and export the results.

mod commands;
mod syntax;

use assetq_core::{AppConfig, Provider};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "assetq")]
#[command(version, about = "Query FOFA, Hunter, and Quake and export the results to CSV")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search FOFA
    Fofa {
        #[command(flatten)]
        args: SearchArgs,

        /// Use the continuation-token endpoint (larger rounds, no page limit)
        #[arg(long)]
        next: bool,
    },

    /// Search Hunter
    Hunter {
        #[command(flatten)]
        args: SearchArgs,
    },

    /// Search Quake
    Quake {
        #[command(flatten)]
        args: SearchArgs,
    },

    /// Show the configuration file, creating a template if none exists
    Config,
}

/// Flags shared by every provider command.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// A single query
    #[arg(short = 's', long = "search", conflicts_with = "file")]
    pub search: Option<String>,

    /// File with one query per line
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// CSV output file (batch mode defaults to `<provider>.csv`)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Print unique URLs only
    #[arg(short = 'u', long = "url")]
    pub url: bool,

    /// Print unique IPs only
    #[arg(long = "ip", conflicts_with = "url")]
    pub ip: bool,

    /// Months back to search (0 = provider default)
    #[arg(short = 'm', long = "months", default_value_t = 0)]
    pub months: u32,

    /// Maximum rows to fetch (0 = provider maximum)
    #[arg(short = 'n', long = "limit", default_value_t = 0)]
    pub limit: usize,

    /// Fetch the first page only
    #[arg(long)]
    pub single_page: bool,

    /// Print the query syntax reference and exit
    #[arg(short = 'k', long = "syntax")]
    pub syntax: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_overrides(|name| std::env::var(name).ok());
            Ok(config)
        }
        None => Ok(AppConfig::load_with_env()?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    info!("assetq v{}", env!("CARGO_PKG_VERSION"));

    let (provider, args, fofa_cursor) = match cli.command {
        Commands::Config => return commands::show_config(cli.config.as_deref()),
        Commands::Fofa { args, next } => (Provider::Fofa, args, next),
        Commands::Hunter { args } => (Provider::Hunter, args, false),
        Commands::Quake { args } => (Provider::Quake, args, false),
    };

    if args.syntax {
        print!("{}", syntax::reference(provider));
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())?;
    commands::search(provider, &args, fofa_cursor, &config).await
}
