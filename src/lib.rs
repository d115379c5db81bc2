//! Storefront
//!
//! Cart ledger and order-total engine for a small web storefront: an in-memory
//! cart with stock-clamped quantities, exact decimal order totals rounded once
//! for display, shipping selection, and a checkout flow that hands a finalized
//! order to an external order store.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod session;
pub mod shipping;
pub mod tags;
