use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use meublerp_api::{ApiClient, DecodePolicy};
use meublerp_cli::commands::{load_order, render, totals_json};
use meublerp_cli::{AppConfig, OutputFormat};
use meublerp_purchasing::{PurchaseOrderId, SupplierPurchaseOrder};

#[derive(Parser, Debug)]
#[command(name = "meublerp", version, about = "Supplier purchase order totals and documents")]
struct Cli {
    /// Reject payloads with unparseable numeric fields instead of coercing them to 0.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the computed lines, total and balance as JSON.
    Totals {
        #[arg(long)]
        input: PathBuf,
    },
    /// Render a purchase order read from a JSON file.
    Render {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::View)]
        format: OutputFormat,
        /// Directory for exported files (defaults to the configured output dir).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fetch a purchase order from the API and render it.
    Fetch {
        #[arg(long)]
        id: PurchaseOrderId,
        #[arg(long, value_enum, default_value_t = OutputFormat::View)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load().context("failed to load configuration")?;
    if cli.strict {
        config.decode_policy = DecodePolicy::Strict;
    }

    meublerp_observability::init_with_filter(&config.log_filter);

    match cli.command {
        Command::Totals { input } => {
            let order = load_order(&input, config.decode_policy)?;
            println!("{}", totals_json(&order)?);
        }
        Command::Render { input, format, out } => {
            let order = load_order(&input, config.decode_policy)?;
            emit(&order, format, out.unwrap_or_else(|| config.output_dir.clone()))?;
        }
        Command::Fetch { id, format, out } => {
            let client = ApiClient::new(config.api_client_config())?;
            let order = client
                .fetch_purchase_order(id)
                .await
                .with_context(|| format!("failed to fetch purchase order {id}"))?;
            tracing::info!(%id, articles = order.articles.len(), "purchase order fetched");
            emit(&order, format, out.unwrap_or_else(|| config.output_dir.clone()))?;
        }
    }

    Ok(())
}

fn emit(order: &SupplierPurchaseOrder, format: OutputFormat, out_dir: PathBuf) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for path in render(order, format, &out_dir, &mut stdout)? {
        eprintln!("{}", path.display());
    }
    Ok(())
}
