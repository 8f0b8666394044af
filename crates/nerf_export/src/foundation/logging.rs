//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Reads `RUST_LOG` like `env_logger::init`, but falls back to `info` for this crate
/// so export progress is visible without any environment setup.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("nerf_export=info"))
        .format_timestamp_millis()
        .init();
}

/// Initialize logging for tests, ignoring repeated initialization
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
