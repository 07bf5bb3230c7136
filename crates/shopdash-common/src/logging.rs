//! Structured logging bootstrap

use std::fs::OpenOptions;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "shopdash_data=debug,info")
    pub level: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json_format: bool,
    /// Multi-line, coloured output for interactive use
    pub pretty_format: bool,
    /// Append log output to this file instead of stderr
    pub file_path: Option<String>,
    /// Log span open/close events
    pub include_spans: bool,
    /// Include the module path of each event
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Initialize the global tracing subscriber with the given configuration
pub fn init_logging(config: LoggingConfig) -> InitResult {
    let env_filter = EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("info"))?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        match config.file_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                registry.with(layer.with_writer(file)).try_init()?;
            }
            None => registry.with(layer.with_writer(std::io::stderr)).try_init()?,
        }
    } else if config.pretty_format {
        let layer = fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        match config.file_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                registry
                    .with(layer.with_ansi(false).with_writer(file))
                    .try_init()?;
            }
            None => registry.with(layer.with_writer(std::io::stderr)).try_init()?,
        }
    } else {
        let layer = fmt::layer()
            .compact()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        match config.file_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                registry
                    .with(layer.with_ansi(false).with_writer(file))
                    .try_init()?;
            }
            None => registry.with(layer.with_writer(std::io::stderr)).try_init()?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(!config.pretty_format);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_file_logging_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopdash.log");

        // A global subscriber may already be installed by another test in
        // this binary; only the file creation is asserted.
        let _ = init_logging(LoggingConfig {
            file_path: Some(path.to_string_lossy().into_owned()),
            ..LoggingConfig::default()
        });

        assert!(path.exists());
    }
}
