//! # Shopfront CLI
//!
//! Command line driver for the shopfront cart and checkout pipeline.
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ShopConfig::load ──► DiscountEngine ─────┐                            │
//! │        │                                  ▼                             │
//! │        │          seed.toml ──► Catalog + Inventory ──► Cart           │
//! │        │                                                 │              │
//! │        └──► OrderStore (memory | json) ──┐               ▼              │
//! │                                          ├──► CheckoutService          │
//! │                     SimulatedGateway ────┘                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results go to stdout as JSON. Logs go to stderr and honour `RUST_LOG`.

mod commands;
mod config;
mod gateway;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{CheckoutArgs, OrdersCommand, QuoteArgs};
use crate::config::ShopConfig;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(about = "Price carts, run checkouts and inspect stored orders")]
#[command(version)]
struct Cli {
    /// Path to a shopfront.toml config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show subtotal, discounts and total for a cart
    Quote(QuoteArgs),

    /// Charge the cart through the simulated gateway and record the order
    Checkout(CheckoutArgs),

    /// Inspect orders in the persistent store
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = ShopConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Quote(args) => commands::quote(&config, args),
        Commands::Checkout(args) => commands::checkout(&config, args),
        Commands::Orders { command } => commands::orders(&config, command),
    }
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug logs
/// - `RUST_LOG=shopfront_core=trace` - Trace the checkout pipeline
/// - Default: `warn,shopfront_core=info`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,shopfront_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
