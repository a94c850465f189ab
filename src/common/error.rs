use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Sheets API error: {message}")]
    Sheets { message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Why a single row could not be resolved. Recovered per row, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("lookup service returned status {0}")]
    Status(u16),

    #[error("unparseable payload: {0}")]
    Payload(String),

    #[error("no addresses in response")]
    NoAddresses,

    #[error("cannot be sent as a path segment: {0:?}")]
    UnroutableQuery(String),
}
