//! Client side of the Greenora marketplace backend.
//!
//! Wraps the REST backend (users, catalog, quotes) and layers the
//! fail-open behaviours the storefront relies on: a quote request always
//! ends in a receipt, and a missing profile falls back to identity data.

pub mod client;
pub mod error;
pub mod profile;
pub mod quote;

pub use client::MarketplaceClient;
pub use error::ClientError;
pub use profile::{DashboardView, ProfileLoader, NOT_SPECIFIED};
pub use quote::{QuoteDesk, QuoteForm, QuoteReceipt, QuoteSubmission, ReceiptSource};
