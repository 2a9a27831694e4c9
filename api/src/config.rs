//! Process-level configuration: `.env` loading and the tracing subscriber

use mk_shared::config::environment::LogFormat;
use mk_shared::LoggingConfig;
use tracing_subscriber::EnvFilter;

pub use mk_shared::AppConfig as Config;

/// Read `.env` into the process environment
///
/// # Returns
///
/// * `Ok(true)` - A file was found and loaded
/// * `Ok(false)` - No `.env` file exists
/// * `Err(_)` - The file exists but could not be parsed
pub fn load_dotenv() -> Result<bool, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
