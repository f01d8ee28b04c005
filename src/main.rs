use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use clap::{Parser, Subcommand};

use sip::core::{SipInputs, compute};
use sip::store::HistoryStore;

#[derive(Parser, Debug)]
#[command(
    name = "sip",
    about = "Systematic Investment Plan calculator with persistent history"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, env = "SIP_HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "SIP_PORT", default_value_t = 5000)]
        port: u16,
        #[arg(
            long,
            env = "SIP_DATABASE_URL",
            default_value = "sqlite://sip_calculator.db",
            help = "SQLite connection string; the file is created if missing"
        )]
        database_url: String,
    },
    /// Print a single projection as JSON without recording it
    Calculate {
        #[arg(long)]
        monthly_investment: f64,
        #[arg(long, allow_negative_numbers = true, help = "Expected annual return in percent, e.g. 12")]
        annual_return: f64,
        #[arg(long)]
        years: i64,
        #[arg(long, help = "Lower the return by the inflation adjustment before projecting")]
        inflation_adjust: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Serve {
            host,
            port,
            database_url,
        } => {
            let store = HistoryStore::connect(&database_url)
                .await
                .with_context(|| format!("failed to open history store at {database_url}"))?;
            store
                .migrate()
                .await
                .context("failed to initialize history schema")?;
            tracing::info!(%database_url, "history store ready");

            sip::api::run_http_server(SocketAddr::new(host, port), store)
                .await
                .context("server error")?;
        }
        Command::Calculate {
            monthly_investment,
            annual_return,
            years,
            inflation_adjust,
        } => {
            let mut inputs = SipInputs::new(monthly_investment, annual_return, years)?;
            if inflation_adjust {
                inputs = inputs.inflation_adjusted();
            }
            let projection = compute(&inputs)?;
            println!("{}", serde_json::to_string_pretty(&projection)?);
        }
    }

    Ok(())
}
