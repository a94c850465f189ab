use std::fs;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped; hold it for the life of the process.
pub fn init_logging() -> Option<WorkerGuard> {
    // Respect RUST_LOG if set; otherwise info for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("address_validator=info,warn"));

    // Without a logs directory, log to the console only
    if fs::create_dir_all("logs").is_err() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer())
            .init();
        return None;
    }

    // Daily-rotated JSON log file
    let file_appender = tracing_appender::rolling::daily("logs", "address_validator.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer())
        .init();

    Some(guard)
}

/// Human-readable stderr output; generic over the subscriber it is layered onto.
fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer().with_target(false).with_writer(std::io::stderr)
}
