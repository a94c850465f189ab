use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::app::RunRequest;
use crate::common::error::{Result, ValidatorError};
use crate::config::ColumnsConfig;

pub const INVALID_INPUT: &str = "INVALID INPUT! Use -h for help";

pub const SETUP_INSTRUCTIONS: &str = "\
INSTRUCTIONS FOR USE:
1) Create a Google service account
2) Share the Google Sheet with your Google service account
3) Place your API key in 'api_key.txt' in the same directory (or set GETADDRESS_API_KEY)
4) Place your client secret in client_secret.json in the same directory
5) Run this program with the usage above";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "address_validator")]
#[command(about = "Build addresses from house numbers and postcodes stored in Google Sheets")]
#[command(version)]
#[command(after_help = SETUP_INSTRUCTIONS)]
pub struct Cli {
    /// Title of the spreadsheet to validate
    #[arg(short = 'r', long = "run", value_name = "SHEET")]
    pub sheet: Option<String>,

    /// Column number holding the first line of the address (A = 1)
    #[arg(long)]
    pub address_col: Option<u32>,

    /// Column number holding the postcode (A = 1)
    #[arg(long)]
    pub postcode_col: Option<u32>,

    /// Row number to start at
    #[arg(long)]
    pub start_row: Option<u32>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Command {
    Run(Cli),
    /// Help or version output; `clap::Error::exit` prints it
    Exit(clap::Error),
    Invalid,
}

/// Anything other than a run with a sheet name, help, or version is invalid input.
pub fn parse_command<I, T>(args: I) -> Command
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) if cli.sheet.as_deref().is_some_and(|s| !s.trim().is_empty()) => Command::Run(cli),
        Ok(_) => Command::Invalid,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Command::Exit(e)
        }
        Err(_) => Command::Invalid,
    }
}

pub fn banner() -> String {
    format!("# Address Validator {}", env!("CARGO_PKG_VERSION"))
}

/// Asks `question` and reads a 1-based number from `input`.
pub fn prompt_number<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    column_hint: bool,
) -> Result<u32> {
    writeln!(output, "{}", question)?;
    if column_hint {
        writeln!(output, "A = 1\nB = 2\n...")?;
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    match line.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ValidatorError::InvalidInput(format!(
            "expected a number of 1 or more, got '{}'",
            line.trim()
        ))),
    }
}

/// Flag first, then config, then an interactive prompt.
pub fn resolve_request<R: BufRead, W: Write>(
    cli: &Cli,
    columns: &ColumnsConfig,
    input: &mut R,
    output: &mut W,
) -> Result<RunRequest> {
    let spreadsheet = cli
        .sheet
        .clone()
        .ok_or_else(|| ValidatorError::InvalidInput("no sheet given".to_string()))?;

    let address_col = match cli.address_col.or(columns.address_col) {
        Some(n) => n,
        None => prompt_number(
            input,
            output,
            "Column number containing first line of address?",
            true,
        )?,
    };
    let postcode_col = match cli.postcode_col.or(columns.postcode_col) {
        Some(n) => n,
        None => prompt_number(input, output, "Column number containing postcode?", true)?,
    };
    let start_row = match cli.start_row.or(columns.start_row) {
        Some(n) => n,
        None => prompt_number(input, output, "Row number to start at:", false)?,
    };

    let request = RunRequest {
        spreadsheet,
        address_col,
        postcode_col,
        start_row,
    };
    request.validate()?;
    Ok(request)
}
