use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "accounts=debug,sqlx=warn";

/// Installs the global `tracing` subscriber.
///
/// Honors `RUST_LOG` for filtering and `LOG_FORMAT=json` for structured output.
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let result = if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(env_filter))
            .with_target(false)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(env_filter))
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}
