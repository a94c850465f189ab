// Row processing: per-row normalization and lookup throttling

pub mod rate_limiter;
pub mod row_validator;

// Re-export key types and functions
pub use rate_limiter::{Limits, RateLimiter};
pub use row_validator::{derive_house_number, format_address, normalize_postcode};
