use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lynx_insights::analytics::{OwnerReportBuilder, ResourceReportBuilder};
use lynx_insights::config::Config;
use lynx_insights::storage;

#[derive(Parser)]
#[command(name = "lynx-insights")]
#[command(about = "Lynx link analytics reports", long_about = None)]
struct Cli {
    /// Indent the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard across every link of an owner (last 30 days vs the 30 before)
    Owner {
        /// Owner ID (the links' created_by)
        owner_id: String,
    },
    /// Lifetime report of a single link
    Link {
        /// Short code of the link
        short_code: String,
    },
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!("Loaded configuration");

    let store = storage::connect(&config.database)
        .await
        .context("failed to connect to the visit store")?;

    match cli.command {
        Commands::Owner { owner_id } => {
            let report = OwnerReportBuilder::with_config(store, config.reports)
                .build(&owner_id)
                .await
                .with_context(|| format!("failed to build report for owner '{owner_id}'"))?;
            print_json(&report, cli.pretty)?;
        }
        Commands::Link { short_code } => {
            let report = ResourceReportBuilder::with_config(store, config.reports)
                .build(&short_code)
                .await
                .with_context(|| format!("failed to build report for link '{short_code}'"))?;

            let Some(report) = report else {
                bail!("link '{short_code}' not found");
            };
            print_json(&report, cli.pretty)?;
        }
    }

    Ok(())
}
