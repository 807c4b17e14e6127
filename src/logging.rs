//! Tracing setup for the docqa binary
//!
//! `RUST_LOG` wins when set; otherwise the level follows the CLI verbosity.
//! Events go to stderr so answers on stdout stay clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Verbosity;

/// Filter directive used when `RUST_LOG` is not set
pub fn default_directive(verbosity: Verbosity) -> String {
    format!("warn,docqa={}", verbosity.log_level())
}

/// Install the global subscriber (call once, from `main`)
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(Verbosity::Normal), "warn,docqa=warn");
        assert_eq!(default_directive(Verbosity::Verbose), "warn,docqa=info");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Verbose);
    }
}
