//! Logger setup

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the global logger once
///
/// `RUST_LOG` takes precedence over `level`, which uses the `env_logger`
/// filter syntax ("info", "rigidscene_physics=debug", ...). Later calls are
/// ignored.
pub fn init_logging(level: &str) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else if level.trim().is_empty() {
            builder.filter_level(log::LevelFilter::Info);
        } else {
            builder.parse_filters(level);
        }

        if builder.try_init().is_err() {
            log::warn!("A logger was already installed");
        }
        log::debug!("Logging initialized");
    });
}
