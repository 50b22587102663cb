//! CLI command implementations.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use shopfront_core::{Cart, CartTotals, CheckoutResult, CheckoutService, Order, OrderStore};
use shopfront_store::{InMemoryCatalog, InMemoryInventory, InMemoryOrderStore, JsonFileOrderStore, SeedFile};
use tracing::info;

use crate::config::{ShopConfig, StoreKind};
use crate::gateway::SimulatedGateway;

// =============================================================================
// Arguments
// =============================================================================

/// One `SKU:QTY` cart entry from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub sku: String,
    pub quantity: i64,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sku, quantity) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected SKU:QTY, got '{}'", s))?;
        let quantity = quantity
            .trim()
            .parse()
            .map_err(|_| format!("quantity in '{}' is not a whole number", s))?;
        Ok(ItemSpec {
            sku: sku.trim().to_string(),
            quantity,
        })
    }
}

/// Catalog seed plus the items to put in the cart.
#[derive(Args, Debug)]
pub struct CartArgs {
    /// TOML file with products and stock levels.
    #[arg(short, long)]
    pub seed: PathBuf,

    /// Cart entry as SKU:QTY. Repeat for more items.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<ItemSpec>,
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub cart: CartArgs,
}

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    #[command(flatten)]
    pub cart: CartArgs,

    /// Payment token handed to the gateway.
    #[arg(short, long)]
    pub token: String,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// Print one stored order.
    Show {
        order_id: String,
    },

    /// List stored orders, newest first.
    List {
        /// Earliest creation time (RFC 3339), inclusive.
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Latest creation time (RFC 3339), inclusive.
        #[arg(long)]
        until: Option<DateTime<Utc>>,
    },
}

// =============================================================================
// Wiring
// =============================================================================

/// Builds a cart from the seed file and fills it with `items`.
pub fn build_cart(config: &ShopConfig, args: &CartArgs) -> Result<Cart> {
    let catalog = Arc::new(InMemoryCatalog::new());
    let inventory = Arc::new(InMemoryInventory::new());
    SeedFile::load(&args.seed)
        .and_then(|seed| seed.apply(&catalog, &inventory))
        .with_context(|| format!("loading seed file {}", args.seed.display()))?;

    let mut cart = Cart::new(catalog)
        .with_inventory(inventory)
        .with_discounts(Arc::new(config.discount_engine()?));

    for item in &args.items {
        cart.add_item(&item.sku, item.quantity)
            .with_context(|| format!("adding {} x {}", item.quantity, item.sku))?;
    }
    Ok(cart)
}

pub fn open_store(config: &ShopConfig) -> Result<Arc<dyn OrderStore>> {
    match config.store.kind {
        StoreKind::Memory => Ok(Arc::new(InMemoryOrderStore::new())),
        StoreKind::Json => {
            let Some(path) = &config.store.path else {
                bail!("store.path is required when store.kind = \"json\"");
            };
            let store = JsonFileOrderStore::open(path)
                .with_context(|| format!("opening order store {}", path.display()))?;
            Ok(Arc::new(store))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// Commands
// =============================================================================

/// Prices the cart without charging anything.
pub fn quote(config: &ShopConfig, args: QuoteArgs) -> Result<bool> {
    let cart = build_cart(config, &args.cart)?;
    let totals: CartTotals = cart.totals();
    print_json(&totals)?;
    Ok(true)
}

#[derive(Debug, Serialize)]
struct CheckoutReport {
    result: CheckoutResult,
    order: Option<Order>,
    items_left_in_cart: usize,
}

/// Runs a checkout. Returns whether it succeeded.
pub fn checkout(config: &ShopConfig, args: CheckoutArgs) -> Result<bool> {
    let mut cart = build_cart(config, &args.cart)?;
    let store = open_store(config)?;
    let service = CheckoutService::new(Arc::new(SimulatedGateway::new())).with_store(store.clone());

    let result = service.checkout(&cart, &args.token)?;

    let order = match result.order_id() {
        Some(order_id) => store.get_by_id(order_id)?,
        None => None,
    };
    if result.is_success() && config.checkout.clear_cart_on_success {
        info!("Clearing cart after successful checkout");
        cart.clear();
    }

    let succeeded = result.is_success();
    print_json(&CheckoutReport {
        result,
        order,
        items_left_in_cart: cart.item_count(),
    })?;
    Ok(succeeded)
}

pub fn orders(config: &ShopConfig, command: OrdersCommand) -> Result<bool> {
    if config.store.kind != StoreKind::Json {
        bail!("orders commands need a persistent store (store.kind = \"json\")");
    }
    let store = open_store(config)?;

    match command {
        OrdersCommand::Show { order_id } => match store.get_by_id(&order_id)? {
            Some(order) => {
                print_json(&order)?;
                Ok(true)
            }
            None => {
                eprintln!("order {} not found", order_id);
                Ok(false)
            }
        },
        OrdersCommand::List { since, until } => {
            let start = since.unwrap_or(DateTime::<Utc>::MIN_UTC);
            let end = until.unwrap_or(DateTime::<Utc>::MAX_UTC);
            let orders = store.get_by_date_range(start, end)?;
            print_json(&orders)?;
            Ok(true)
        }
    }
}
