//! Process start-up: logging and the shared connection pool.

use sea_orm::{DatabaseConnection, DbErr};

use crate::config::{AppConfig, LoggingConfig};
use crate::infrastructure::shared_connection;

/// Initialize tracing (logging) from the logging config.
///
/// Call this once at process startup. `RUST_LOG` takes precedence over
/// the configured level.
pub fn init_tracing(config: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    match config.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

/// Connects the process-wide pool described by `config`.
pub async fn connect(config: &AppConfig) -> Result<&'static DatabaseConnection, DbErr> {
    shared_connection(&config.database_config()).await
}
