pub mod http_client;
pub mod lookup_adapter;
pub mod rate_limiter_adapter;
pub mod sheets;
