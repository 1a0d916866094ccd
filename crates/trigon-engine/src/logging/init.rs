use std::sync::Once;

/// Filter applied when neither the config nor `RUST_LOG` names one.
pub const DEFAULT_FILTER: &str = "info";

/// Filter that traces every acquire and release step of a run.
pub const ACQUISITION_TRACE_FILTER: &str = "info,trigon_engine=debug";

/// How the process logger is set up.
///
/// `env_filter` uses `env_logger` directive syntax ("warn",
/// "trigon_engine::context=debug"). When it is `None`, `RUST_LOG` is consulted,
/// then [`DEFAULT_FILTER`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Debug output for the engine crate, info for everything else.
    pub fn acquisition_trace() -> Self {
        Self {
            env_filter: Some(ACQUISITION_TRACE_FILTER.to_owned()),
            ..Self::default()
        }
    }

    /// The directive string the logger ends up with, given `RUST_LOG`.
    pub fn resolve_filter(&self, rust_log: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(rust_log.filter(|f| !f.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
    }
}

static INIT: Once = Once::new();

/// Installs the stderr logger for the process.
///
/// Only the first call has an effect. If another logger is already installed
/// (a test harness, say) it is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());

        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .try_init()
            .is_ok();

        if installed {
            log::debug!("logger installed with filter `{filter}`");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_rust_log() {
        let config = LoggingConfig::acquisition_trace();
        assert_eq!(
            config.resolve_filter(Some("error".into())),
            ACQUISITION_TRACE_FILTER
        );
    }

    #[test]
    fn rust_log_then_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.resolve_filter(Some("warn".into())), "warn");
        assert_eq!(config.resolve_filter(Some("  ".into())), DEFAULT_FILTER);
        assert_eq!(config.resolve_filter(None), DEFAULT_FILTER);
    }

    #[test]
    fn second_init_is_ignored() {
        init_logging(LoggingConfig::acquisition_trace());
        init_logging(LoggingConfig::default());
        assert!(log::max_level() >= log::LevelFilter::Info);
    }
}
