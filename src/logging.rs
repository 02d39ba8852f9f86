//! Process-wide logger setup.

use std::sync::Once;

use env_logger::Env;
use log::{debug, SetLoggerError};

static INIT: Once = Once::new();

/// Install the `env_logger` backend once per process.
///
/// Reads `RUST_LOG`, defaulting to `info`. Later calls are no-ops. If another
/// logger is already installed it is kept, and the refusal is logged through
/// it at debug level.
pub fn init() {
    INIT.call_once(|| {
        if let Err(e) = try_install() {
            debug!("Keeping the already installed logger: {e}");
        }
    });
}

fn try_install() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init()
}
