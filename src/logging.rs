use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Install the global tracing subscriber.
///
/// `LOG_LEVEL` and `LOG_FORMAT` override the configured values. `RUST_LOG`
/// style directives are accepted as the level.
pub fn init(settings: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.format.clone());

    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    // A subscriber may already be installed (tests, embedding)
    let _ = if format == "pretty" {
        subscriber.pretty().try_init()
    } else {
        subscriber.try_init()
    };
}
