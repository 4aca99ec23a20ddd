// Tracing initialization for the CLI and the pipeline job.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a stderr fmt subscriber filtered at `level`; `RUST_LOG` wins when set.
pub fn init_tracing_with_level(level: &str) {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), level);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn build_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used_without_rust_log() {
        assert_eq!(build_filter(None, "warn").to_string(), "warn");
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        let filter = build_filter(Some("scsync_engine=trace"), "warn");
        assert_eq!(filter.to_string(), "scsync_engine=trace");
    }

    #[test]
    fn unparseable_rust_log_falls_back_to_level() {
        assert_eq!(build_filter(Some("=[{"), "info").to_string(), "info");
    }
}
