use std::net::SocketAddr;

use axum::{routing::get, Router};

use crate::storage::Storage;

mod error;
mod handlers;
pub(crate) mod models;

use handlers::{
    create_repair, health, list_clients, list_countries, list_machine_types, list_machines,
    list_repair_types, list_repairs, not_found, root,
};

#[derive(Clone)]
pub struct AppState<S: Storage> {
    pub storage: S,
    pub started_at: std::time::SystemTime,
}

pub fn router<S: Storage + Clone + Send + Sync + 'static>(storage: S) -> Router {
    let state = AppState {
        storage,
        started_at: std::time::SystemTime::now(),
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health::<S>))
        .route("/clients", get(list_clients::<S>))
        .route("/clients/", get(list_clients::<S>))
        .route("/countries", get(list_countries::<S>))
        .route("/machine-types", get(list_machine_types::<S>))
        .route("/machines", get(list_machines::<S>))
        .route("/machines/", get(list_machines::<S>))
        .route("/repair-types", get(list_repair_types::<S>))
        .route(
            "/repairs",
            get(list_repairs::<S>).post(create_repair::<S>),
        )
        .route(
            "/repairs/",
            get(list_repairs::<S>).post(create_repair::<S>),
        )
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    storage: S,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let app = router(storage);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 REST listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
