use {
    std::sync::Once,
    tracing::level_filters::LevelFilter,
    tracing_subscriber::{EnvFilter, fmt, fmt::writer::MakeWriterExt as _, prelude::*},
};

/// Default filter used when neither the config nor `RUST_LOG` specifies one.
pub const DEFAULT_FILTER: &str = "warn,routing=debug";

#[derive(Clone, Debug)]
pub struct Config {
    /// `tracing_subscriber` env filter directives.
    pub env_filter: String,
    /// Events at or above this level additionally go to stderr instead of
    /// stdout.
    pub stderr_threshold: LevelFilter,
    /// Emit one JSON object per event instead of human readable lines.
    pub use_json_format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_filter: DEFAULT_FILTER.to_string(),
            stderr_threshold: LevelFilter::ERROR,
            use_json_format: false,
        }
    }
}

impl Config {
    pub fn new(env_filter: &str, stderr_threshold: LevelFilter, use_json_format: bool) -> Self {
        Self {
            env_filter: env_filter.to_string(),
            stderr_threshold,
            use_json_format,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes tracing setup that is shared between the binaries and tests.
/// Subsequent calls are no-ops, so tests can call this freely.
pub fn initialize(config: &Config) {
    INIT.call_once(|| set_tracing_subscriber(config));
}

fn set_tracing_subscriber(config: &Config) {
    let env_filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.env_filter))
    };
    let stderr_threshold = config.stderr_threshold;

    // Events less severe than `stderr_threshold` end up on stdout, the rest
    // on stderr.
    let registry = tracing_subscriber::registry();
    if config.use_json_format {
        let stdout = fmt::layer()
            .json()
            .with_writer(std::io::stdout.with_filter(move |meta| {
                meta.level() > &stderr_threshold
            }))
            .with_filter(env_filter());
        let stderr = fmt::layer()
            .json()
            .with_writer(std::io::stderr.with_filter(move |meta| {
                meta.level() <= &stderr_threshold
            }))
            .with_filter(env_filter());
        let _ = registry.with(stdout).with(stderr).try_init();
    } else {
        let stdout = fmt::layer()
            .with_ansi(false)
            .with_writer(std::io::stdout.with_filter(move |meta| {
                meta.level() > &stderr_threshold
            }))
            .with_filter(env_filter());
        let stderr = fmt::layer()
            .with_ansi(false)
            .with_writer(std::io::stderr.with_filter(move |meta| {
                meta.level() <= &stderr_threshold
            }))
            .with_filter(env_filter());
        let _ = registry.with(stdout).with(stderr).try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_idempotent() {
        let config = Config::new("debug", LevelFilter::WARN, true);
        initialize(&config);
        initialize(&Config::default());
        tracing::debug!("still logging");
    }
}
