use tracing_subscriber::EnvFilter;

/// Initialize diagnostic logging with tracing-subscriber.
///
/// Uses `RUST_LOG` if set, otherwise the provided level. Logs go to stderr so
/// stage progress on stdout stays clean.
pub fn init(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
