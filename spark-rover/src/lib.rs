pub mod config;
pub mod control;
pub mod detect;
pub mod presentation;
pub mod server;
pub mod session;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "spark_rover=info,spark_media=info,actix_web=warn";

/// Installs the global subscriber; `log` records are bridged into it. `RUST_LOG` wins
/// over the default filter. Safe to call more than once.
pub fn log_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
