pub mod config;
pub mod depreciation;
pub mod estimator;
pub mod features;
pub mod form;
pub mod format;
pub mod loader;
pub mod model;
pub mod ui;

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` if set, `info` otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
