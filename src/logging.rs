use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the stdout log sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber: one stdout sink filtered at `level`.
///
/// `RUST_LOG` overrides `level` when set. Fails if a subscriber is already
/// installed; there is no way to reconfigure logging afterwards.
pub fn setup_logging(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stdout))
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stdout))
            .try_init()?,
    }

    Ok(())
}

/// Default filter for the service given the `debug` setting.
pub fn default_level(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}
