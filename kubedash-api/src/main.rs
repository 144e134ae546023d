use std::sync::Arc;

use kubedash_api::auth::KubeAccessReviewer;
use kubedash_api::config::DashboardConfig;
use kubedash_api::kubernetes::{K8sClient, KubeRegistryBackend};
use kubedash_api::{logging, routes, shutdown, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::load()?;
    config.validate()?;

    let _log_guard = logging::init(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.auth.disable_auth {
        warn!("Authorization is DISABLED: every request is allowed (APP_DISABLE_AUTH=true)");
    }
    info!(
        header = %config.auth.userid_header,
        prefix = %config.auth.userid_prefix,
        "Reading caller identity from header"
    );

    let client = K8sClient::from_settings(&config.kubernetes).await?;
    info!(api_server = %client.api_server(), "Connected Kubernetes client");

    let addr = config.bind_addr();
    let state = AppState::new(
        config.auth,
        Arc::new(KubeAccessReviewer::new(client.clone())),
        Arc::new(KubeRegistryBackend::new(client.clone())),
        Arc::new(client),
    );
    let app = routes::router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("kubedash API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
