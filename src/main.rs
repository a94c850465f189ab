use anyhow::Context;
use tracing::info;

use address_validator::cli::{self, Command, INVALID_INPUT};
use address_validator::config::Config;
use address_validator::context::AppContext;
use address_validator::observability::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match cli::parse_command(std::env::args_os()) {
        Command::Run(cli) => cli,
        Command::Exit(help) => help.exit(),
        Command::Invalid => {
            println!("{}", INVALID_INPUT);
            return Ok(());
        }
    };

    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = init_logging();

    println!("{}", cli::banner());

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let context = AppContext::from_config(config).context("Setup failed")?;

    let request = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        cli::resolve_request(&cli, &context.config().columns, &mut input, &mut output)?
    };

    info!(spreadsheet = %request.spreadsheet, "Starting validation run");
    let report = context
        .run(&request)
        .await
        .with_context(|| format!("Validation run for '{}' failed", request.spreadsheet))?;

    println!("\n📊 Results for {}:", request.spreadsheet);
    println!("   Rows read: {}", report.rows_read);
    println!("   Processed: {}", report.processed);
    println!("   Resolved: {}", report.resolved);
    println!("   BAD INPUT: {}", report.failed);
    println!(
        "   Written to '{}': {}",
        context.config().sheets.output_worksheet,
        report.written
    );

    Ok(())
}
