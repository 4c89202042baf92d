//! Log subscriber setup for hosts without their own

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "featuregate=info,featuregate_core=info";

/// Install a `fmt` subscriber filtered by `RUST_LOG`. Returns `false` when a
/// global subscriber was already installed.
pub fn init() -> bool {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
	tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init().is_ok()
}

// vim: ts=4
