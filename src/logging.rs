use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "TIME_TRACKING_LOG";

/// Install the stderr subscriber. `TIME_TRACKING_LOG` wins when set;
/// otherwise only warnings show, or debug output with `--verbose`.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
