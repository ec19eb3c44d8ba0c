//! Diagnostic logging setup for the binary.
//!
//! stdout carries reports; all log output goes to stderr. `RUST_LOG` wins
//! over the built-in filter when set.

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "hueaudit=debug"
    } else {
        "hueaudit=warn"
    }
}

/// Install the global subscriber. Call once at startup; later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_by_verbosity() {
        assert_eq!(default_directive(false), "hueaudit=warn");
        assert_eq!(default_directive(true), "hueaudit=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
        tracing::debug!("after init");
    }
}
