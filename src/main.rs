use anyhow::Context;
use bearergate::logging::init_tracing;
use bearergate::metrics::init_metrics;
use bearergate::router::init_router;
use bearergate::state::init_app_state;
use dotenvy::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guard = init_tracing("storage/logs")?;

    let state = init_app_state();
    let gate = state.build_gate()?;

    let metrics = match init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            None
        }
    };

    let app = init_router(gate, &state.cors_config, metrics);

    let listener = tokio::net::TcpListener::bind(&state.server_config.addr)
        .await
        .with_context(|| format!("failed to bind {}", state.server_config.addr))?;
    info!(addr = %state.server_config.addr, "Server running");

    axum::serve(listener, app).await?;
    Ok(())
}
