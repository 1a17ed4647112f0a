//! Diagnostics on stderr, kept apart from command output on stdout.

use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber for the CLI.
///
/// `RUST_LOG` takes directives such as `debug` or `warn,aepflow=trace`.
/// Records from crates logging through `log` (reqwest, hyper) are bridged in.
/// Calling this more than once is harmless.
pub fn init() {
    let _ = LogTracer::init();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter_from_env(DEFAULT_DIRECTIVE))
        .with(stderr_layer)
        .try_init();
}

fn filter_from_env(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}
