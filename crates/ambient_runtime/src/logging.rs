//! Tracing setup for the `ambient` binary.
//!
//! The subscriber is only installed when `AMBIENT_LOG` or `RUST_LOG` is
//! set. `AMBIENT_LOG` wins when both are present; both use the `RUST_LOG`
//! directive syntax (e.g. `debug`, `ambient_catalog=trace`). Output goes
//! to stderr so it never mixes with query results.

use tracing_subscriber::EnvFilter;

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "AMBIENT_LOG";

/// Builds the filter from the first of `AMBIENT_LOG` / `RUST_LOG` that is set.
fn build_filter(ambient: Option<String>, rust: Option<String>) -> Option<EnvFilter> {
    ambient
        .or(rust)
        .map(|directives| EnvFilter::builder().parse_lossy(directives))
}

/// Installs the global subscriber if logging was requested.
///
/// Returns true if a subscriber was installed.
pub fn init() -> bool {
    let Some(filter) = build_filter(std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok())
    else {
        return false;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
