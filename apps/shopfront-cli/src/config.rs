//! # Shop Configuration
//!
//! Configuration for discount rules, checkout policy and order storage.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHOPFRONT_BULK_RATE_BPS=1500                                       │
//! │     SHOPFRONT_STORE_KIND=json                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>  or  SHOPFRONT_CONFIG=<path>                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     10 units / 10% bulk, 1000 / 5% order, memory store                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # shopfront.toml
//! [discounts]
//! bulk_enabled = true
//! bulk_min_quantity = 10
//! bulk_rate_bps = 1000       # 10%
//! order_enabled = true
//! order_min_subtotal = "1000"
//! order_rate_bps = 500       # 5%
//!
//! [checkout]
//! clear_cart_on_success = false
//!
//! [store]
//! kind = "json"              # memory | json
//! path = "orders.json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shopfront_core::{BulkDiscountRule, DiscountEngine, DiscountRate, Money, OrderDiscountRule};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SHOPFRONT_CONFIG";

/// Largest accepted discount rate (100%).
const MAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Store Kind
// =============================================================================

/// Which order store backs checkouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Orders live for the lifetime of the process.
    #[default]
    Memory,

    /// Orders are mirrored to a JSON file.
    Json,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Memory => write!(f, "memory"),
            StoreKind::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreKind::Memory),
            "json" | "file" => Ok(StoreKind::Json),
            other => Err(ConfigError::InvalidValue {
                key: "store.kind".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Discount rule settings. Defaults are the reference rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountSettings {
    #[serde(default = "default_true")]
    pub bulk_enabled: bool,

    /// Per-line quantity at which the bulk rule applies.
    #[serde(default = "default_bulk_min_quantity")]
    pub bulk_min_quantity: u32,

    #[serde(default = "default_bulk_rate_bps")]
    pub bulk_rate_bps: u32,

    #[serde(default = "default_true")]
    pub order_enabled: bool,

    /// Subtotal (inclusive) at which the order rule applies.
    #[serde(default = "default_order_min_subtotal")]
    pub order_min_subtotal: Money,

    #[serde(default = "default_order_rate_bps")]
    pub order_rate_bps: u32,
}

fn default_true() -> bool {
    true
}

fn default_bulk_min_quantity() -> u32 {
    BulkDiscountRule::DEFAULT_MIN_QUANTITY
}

fn default_bulk_rate_bps() -> u32 {
    BulkDiscountRule::DEFAULT_RATE.bps()
}

fn default_order_min_subtotal() -> Money {
    Money::from_whole(OrderDiscountRule::DEFAULT_MIN_SUBTOTAL)
}

fn default_order_rate_bps() -> u32 {
    OrderDiscountRule::DEFAULT_RATE.bps()
}

impl Default for DiscountSettings {
    fn default() -> Self {
        DiscountSettings {
            bulk_enabled: true,
            bulk_min_quantity: default_bulk_min_quantity(),
            bulk_rate_bps: default_bulk_rate_bps(),
            order_enabled: true,
            order_min_subtotal: default_order_min_subtotal(),
            order_rate_bps: default_order_rate_bps(),
        }
    }
}

/// What happens around a checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Empty the cart after a successful checkout.
    #[serde(default)]
    pub clear_cart_on_success: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub kind: StoreKind,

    /// Snapshot file, required for `json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete shop configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub discounts: DiscountSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

impl ShopConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `SHOPFRONT_CONFIG`)
    /// 3. `SHOPFRONT_*` environment variables
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                info!(path = %path.display(), "Loading shop config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::parse(&contents)?
            }
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let d = &self.discounts;
        if d.bulk_min_quantity == 0 {
            return Err(ConfigError::Invalid(
                "discounts.bulk_min_quantity must be greater than 0".into(),
            ));
        }
        for (key, bps) in [
            ("discounts.bulk_rate_bps", d.bulk_rate_bps),
            ("discounts.order_rate_bps", d.order_rate_bps),
        ] {
            if bps > MAX_RATE_BPS {
                return Err(ConfigError::Invalid(format!(
                    "{} must be at most {} (100%), got {}",
                    key, MAX_RATE_BPS, bps
                )));
            }
        }

        if self.store.kind == StoreKind::Json && self.store.path.is_none() {
            return Err(ConfigError::Invalid(
                "store.path is required when store.kind = \"json\"".into(),
            ));
        }

        Ok(())
    }

    /// Applies `SHOPFRONT_*` overrides read through `var`.
    fn apply_overrides<F>(&mut self, var: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(key: &str, value: String) -> ConfigResult<T> {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                })
        }

        if let Some(v) = var("SHOPFRONT_BULK_ENABLED") {
            self.discounts.bulk_enabled = parsed("SHOPFRONT_BULK_ENABLED", v)?;
        }
        if let Some(v) = var("SHOPFRONT_BULK_MIN_QUANTITY") {
            self.discounts.bulk_min_quantity = parsed("SHOPFRONT_BULK_MIN_QUANTITY", v)?;
        }
        if let Some(v) = var("SHOPFRONT_BULK_RATE_BPS") {
            debug!(bps = %v, "Overriding bulk rate from environment");
            self.discounts.bulk_rate_bps = parsed("SHOPFRONT_BULK_RATE_BPS", v)?;
        }
        if let Some(v) = var("SHOPFRONT_ORDER_ENABLED") {
            self.discounts.order_enabled = parsed("SHOPFRONT_ORDER_ENABLED", v)?;
        }
        if let Some(v) = var("SHOPFRONT_ORDER_MIN_SUBTOTAL") {
            self.discounts.order_min_subtotal = parsed("SHOPFRONT_ORDER_MIN_SUBTOTAL", v)?;
        }
        if let Some(v) = var("SHOPFRONT_ORDER_RATE_BPS") {
            debug!(bps = %v, "Overriding order rate from environment");
            self.discounts.order_rate_bps = parsed("SHOPFRONT_ORDER_RATE_BPS", v)?;
        }
        if let Some(v) = var("SHOPFRONT_CLEAR_CART_ON_SUCCESS") {
            self.checkout.clear_cart_on_success = parsed("SHOPFRONT_CLEAR_CART_ON_SUCCESS", v)?;
        }
        if let Some(v) = var("SHOPFRONT_STORE_KIND") {
            debug!(kind = %v, "Overriding store kind from environment");
            self.store.kind = v.parse()?;
        }
        if let Some(v) = var("SHOPFRONT_STORE_PATH") {
            self.store.path = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// Builds the discount engine these settings describe.
    pub fn discount_engine(&self) -> ConfigResult<DiscountEngine> {
        let d = &self.discounts;
        let mut engine = DiscountEngine::new();

        if d.bulk_enabled {
            engine
                .add_rule(BulkDiscountRule::new(
                    d.bulk_min_quantity,
                    DiscountRate::from_bps(d.bulk_rate_bps),
                ))
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        if d.order_enabled {
            engine
                .add_rule(OrderDiscountRule::new(
                    d.order_min_subtotal,
                    DiscountRate::from_bps(d.order_rate_bps),
                ))
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        debug!(rules = ?engine.rule_names(), "Discount engine built");
        Ok(engine)
    }
}
