use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

use crate::config::{LogFormat, LoggingConfig};

/// Filter from `RUST_LOG` when set, otherwise from the configured level.
fn build_filter(cfg: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(cfg: &LoggingConfig) {
    let filter = build_filter(cfg);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stderr);

    let installed = match cfg.format {
        LogFormat::Text => builder.with_target(true).try_init(),
        LogFormat::Json => builder
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init(),
    };

    if let Err(e) = installed {
        tracing::debug!(error = %e, "Global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        let cfg = LoggingConfig {
            level: "cpt_engine=[".to_owned(),
            format: LogFormat::Text,
        };
        let filter = build_filter(&cfg);
        assert!(!filter.to_string().is_empty());
    }
}
