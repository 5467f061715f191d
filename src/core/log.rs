use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. Logs go to stderr so tables on stdout stay clean.
///
/// When `RUST_LOG` is set it alone decides what is logged. Otherwise everything
/// logs at WARN, and `verbose` turns on debug output for this crate.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let crate_filter = default_filter(verbose, env_filter.is_some());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(crate_filter)
        .with(env_filter)
        .init();
}

fn default_filter(verbose: bool, rust_log_set: bool) -> Option<Targets> {
    if rust_log_set {
        return None;
    }
    let crate_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    Some(
        Targets::new()
            .with_target(env!("CARGO_CRATE_NAME"), crate_level)
            .with_default(LevelFilter::WARN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_rust_log_replaces_default_filter() {
        assert!(default_filter(false, true).is_none());
        assert!(default_filter(true, true).is_none());
    }

    #[test]
    fn test_default_filter_levels() {
        let quiet = default_filter(false, false).unwrap();
        assert!(quiet.would_enable("spendlog::core::ledger", &Level::WARN));
        assert!(!quiet.would_enable("spendlog::core::ledger", &Level::DEBUG));
        assert!(!quiet.would_enable("reqwest", &Level::INFO));

        let verbose = default_filter(true, false).unwrap();
        assert!(verbose.would_enable("spendlog::core::cache", &Level::DEBUG));
        assert!(!verbose.would_enable("hyper", &Level::DEBUG));
    }
}
