use clap::{Args, Parser, Subcommand};
use chrono::Utc;
use std::io::Write;
use std::sync::Arc;

use crate::adapters::InMemoryTransactionRepository;
use crate::config::Config;
use crate::services::seed;
use crate::services::{TransactionQueryParams, TransactionQueryService};
use crate::startup::validate_environment;
use crate::upstream::UpstreamClient;

#[derive(Parser)]
#[command(name = "storefront-core")]
#[command(about = "Storefront Core - order and transaction backend for the storefront", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Configuration validation
    Config,

    /// Seed a transaction store and write one filtered page as CSV to stdout
    ExportTransactions(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Inclusive lower bound (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Inclusive upper bound (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Free-text match on id, reference or amount
    #[arg(long)]
    pub q: Option<String>,

    #[arg(long)]
    pub page: Option<String>,

    #[arg(long)]
    pub limit: Option<String>,
}

impl From<ExportArgs> for TransactionQueryParams {
    fn from(args: ExportArgs) -> Self {
        TransactionQueryParams {
            page: args.page,
            limit: args.limit,
            from: args.from,
            to: args.to,
            q: args.q,
        }
    }
}

pub async fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Upstream URL: {}", config.upstream_url);
    println!("  Environment: {}", config.environment);
    println!("  CSV Time Zone: {:?}", config.csv_timezone);
    println!(
        "  Seed Sizes: {} transactions, {} orders",
        config.seed_transactions, config.seed_orders
    );
    match &config.cors_allowed_origins {
        Some(origins) => println!("  CORS Origins: {}", origins.join(", ")),
        None => println!("  CORS Origins: (disabled)"),
    }

    let upstream = UpstreamClient::new(config.upstream_url.clone());
    let report = validate_environment(config, &upstream).await;
    report.print();

    if !report.is_valid() {
        anyhow::bail!("Configuration is invalid");
    }

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}

/// Writes the requested page of a freshly seeded store to `out`.
pub async fn handle_export_transactions<W: Write>(
    config: &Config,
    args: ExportArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let transactions = {
        let mut rng = rand::thread_rng();
        seed::generate_transactions(&mut rng, config.seed_transactions, Utc::now())
    };
    let service = TransactionQueryService::new(
        Arc::new(InMemoryTransactionRepository::new(transactions)),
        config.csv_timezone,
    );

    let params = TransactionQueryParams::from(args);
    let csv = service.export_csv(&params).await?;

    out.write_all(csv.as_bytes())?;
    out.flush()?;

    tracing::info!(bytes = csv.len(), "Transactions exported");
    Ok(())
}
