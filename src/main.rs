//! Storefront order summary
//!
//! Loads a fixture set, builds its cart and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-s` to override the shipping method

use std::io;

use anyhow::Result;
use tracing::info;

use storefront::{config::StorefrontConfig, fixtures::Fixture, observability::init_subscriber};

fn main() -> Result<()> {
    let config = StorefrontConfig::load()?;

    init_subscriber(&config)?;

    let fixture = Fixture::from_set_in(&config.fixtures_dir, &config.fixture)?;
    let mut session = fixture.session()?;

    if let Some(method) = config.shipping {
        session.select_shipping(method);
    }

    info!(
        fixture = %config.fixture,
        lines = session.lines().len(),
        items = session.item_count(),
        shipping = %session.shipping_method(),
        "loaded cart"
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    session.receipt()?.write_to(&mut handle)?;

    Ok(())
}
