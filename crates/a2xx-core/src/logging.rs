//! Logging setup
//!
//! Library code only emits `tracing` events; callers that want them printed
//! install a subscriber through [`init`].

use crate::config::DebugConfig;
use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this more than once,
/// or after another subscriber was installed, leaves the existing one alone.
pub fn init(config: &DebugConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter()));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
    {
        tracing::debug!("Logging initialized at {:?}", config.log_level);
    }
}
