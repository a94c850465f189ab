// Google Sheets access: service-account auth, A1 ranges, and the REST client

pub mod auth;
pub mod client;
pub mod range;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use client::SheetsClient;
