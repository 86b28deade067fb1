//! Logging bootstrap
//!
//! The library only talks to the `log` facade; binaries pick the backend.

pub use log::{debug, error, info, trace, warn};

/// Initialize `env_logger` at `Info`, honouring `RUST_LOG`
pub fn init() {
    init_with_level(log::LevelFilter::Info);
}

/// Initialize `env_logger` with a default level that `RUST_LOG` can override
pub fn init_with_level(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Like [`init_with_level`] but tolerates an already-installed logger
///
/// Returns false when another logger was registered first.
pub fn try_init_with_level(level: log::LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .is_ok()
}
