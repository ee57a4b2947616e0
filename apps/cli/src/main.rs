use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use stablepay_liquidity::auth::StaticTokenProvider;
use stablepay_liquidity::config::ClientConfig;
use stablepay_liquidity::transactions::TransactionFilter;
use stablepay_liquidity::{DashboardService, Error};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Command-line dashboard for StablePay liquidity providers.
#[derive(Debug, Parser)]
#[command(name = "stablepay", version)]
struct Options {
    /// API root including the version prefix.
    #[arg(long, env = "STABLEPAY_API_URL", global = true)]
    api_url: Option<String>,

    /// Bearer token of the signed-in session.
    #[arg(long, env = "STABLEPAY_API_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Balance, lock state and pool summary.
    Overview,
    /// Public pool statistics.
    PoolStats,
    /// Where to send USDC on Base.
    DepositInstructions,
    /// Ask the backend to scan for and credit new deposits.
    CheckDeposits,
    /// Withdraw funds to an external address.
    Withdraw {
        /// Amount in USDC, or "max" for the whole balance.
        #[arg(long)]
        amount: String,
        /// Destination address (0x followed by 40 hex characters).
        #[arg(long)]
        to: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Transaction history.
    Transactions {
        /// all, deposit, withdrawal or earning.
        #[arg(long = "type", default_value = "all")]
        kind: TransactionFilter,
        /// Write the rows as CSV to this file or directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Earnings summary and recent daily breakdown.
    Earnings,
    /// Notifications, newest first.
    Notifications,
    /// Mark one notification as read.
    MarkRead { id: String },
    /// Show or change settings.
    Settings {
        /// Flip a preference: email, push, alerts, summary or 2fa.
        #[arg(long)]
        toggle: Option<String>,
        /// Preferred display currency, e.g. EUR.
        #[arg(long)]
        currency: Option<String>,
    },
}

impl Options {
    async fn run(self) -> anyhow::Result<()> {
        let mut config = ClientConfig::from_env();
        if let Some(api_url) = self.api_url.as_deref() {
            config = config.with_base_url(api_url);
        }
        log::debug!("[Cli] Using API at {}", config.base_url);

        let auth = Arc::new(StaticTokenProvider::new(self.token));
        let dashboard = DashboardService::from_config(config, auth)?;
        commands::execute(&dashboard, self.command).await
    }
}

/// Installs the tracing subscriber. `log` records from the library are
/// forwarded into it.
fn init_tracing() {
    let log_format = std::env::var("STABLEPAY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let opt = Options::parse();
    if let Err(err) = opt.run().await {
        match err.downcast_ref::<Error>() {
            Some(e) if e.is_auth() => {
                eprintln!("{e}");
                eprintln!("Sign in again and export a fresh token as STABLEPAY_API_TOKEN.");
            }
            _ => eprintln!("error: {err:#}"),
        }
        exit(1);
    }
}
