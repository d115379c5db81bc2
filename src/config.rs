//! Configuration

use std::path::PathBuf;

use clap::Parser;

use crate::shipping::ShippingMethod;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Storefront order summary configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Print the order summary for a fixture cart", long_about = None)]
pub struct StorefrontConfig {
    /// Directory containing `products/`, `shipping/` and `carts/` fixtures
    #[arg(short = 'd', long, env = "STOREFRONT_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Fixture set to load
    #[arg(short, long, env = "STOREFRONT_FIXTURE", default_value = "storefront")]
    pub fixture: String,

    /// Shipping method (standard, express); overrides the fixture cart's selection
    #[arg(short, long, env = "STOREFRONT_SHIPPING")]
    pub shipping: Option<ShippingMethod>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
