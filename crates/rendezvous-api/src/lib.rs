pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::ApiState;

/// Build the HTTP router. Browser clients call from other origins, so CORS
/// is wide open.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::handle_root))
        .route(
            "/communities",
            get(handlers::handle_list).post(handlers::handle_register),
        )
        .route("/communities/heartbeat", post(handlers::handle_heartbeat))
        .route("/status", get(handlers::handle_status))
        .with_state(state)
        .layer(cors)
}

/// Serve the API on an already-bound listener until shutdown is signalled.
pub async fn serve(
    listener: TcpListener,
    state: ApiState,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("API shutting down");
        })
        .await?;
    Ok(())
}
