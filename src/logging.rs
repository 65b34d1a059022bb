use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// the stdio transport.
pub fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().with_target(false).init();
    } else {
        builder.with_target(false).compact().init();
    }
}
