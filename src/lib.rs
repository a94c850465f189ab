//! Resolve house numbers and postcodes held in a Google Sheet into full
//! addresses using the getAddress.io lookup API.

pub mod app;
pub mod cli;
pub mod common;
pub mod config;
pub mod context;
pub mod infra;
pub mod observability;
pub mod pipeline;

pub use common::{AddressPair, NormalizedQuery, ValidationResult};
