/// Fixed names and endpoints shared across the codebase

// Lookup service (getAddress.io)
pub const LOOKUP_BASE_URL: &str = "https://api.getaddress.io";
pub const LOOKUP_API_VERSION: &str = "v2";
pub const LOOKUP_COUNTRY: &str = "uk";

/// Written in place of an address when a row cannot be resolved
pub const BAD_INPUT_MARKER: &str = "BAD INPUT";

// Google APIs
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const SHEETS_SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive.readonly";
pub const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

// Output worksheet
pub const OUTPUT_WORKSHEET: &str = "Validated Addresses";
pub const OUTPUT_COLUMNS: u32 = 1;

// Files and environment
pub const DEFAULT_CONFIG_FILE: &str = "address_validator.toml";
pub const DEFAULT_API_KEY_FILE: &str = "api_key.txt";
pub const DEFAULT_CREDENTIALS_FILE: &str = "client_secret.json";
pub const API_KEY_ENV: &str = "GETADDRESS_API_KEY";
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

// Lookup defaults
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Log a progress line every this many rows
pub const PROGRESS_LOG_INTERVAL: usize = 25;
