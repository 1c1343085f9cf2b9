use tracing::info;

use crate::aggregator::Aggregator;
use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::Config;
use crate::errors::RelayError;

pub async fn handle_serve(args: ServeArgs, config: &Config) -> Result<(), RelayError> {
    info!(host = %args.host, port = args.port, "Starting relay server");

    let aggregator = Aggregator::from_config(config);
    let state = api::create_app_state(aggregator);
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RelayError::Internal(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
