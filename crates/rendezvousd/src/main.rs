//! rendezvousd — onion community discovery daemon.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use rendezvous_core::config::RendezvousConfig;
use rendezvous_services::{new_registry, Reaper};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    if let Err(e) = RendezvousConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = RendezvousConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        let mut config = RendezvousConfig::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.sanitize();
        config
    });

    let liveness_timeout = config.registry.liveness_timeout();
    let sweep_interval = config.registry.sweep_interval();
    tracing::info!(
        liveness_timeout_secs = liveness_timeout.as_secs(),
        sweep_interval_secs = sweep_interval.as_secs(),
        "rendezvousd starting"
    );

    let registry = new_registry(liveness_timeout);

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    // ── Spawn tasks ──────────────────────────────────────────────────────────

    let reaper_task = tokio::spawn(
        Reaper::new(registry.clone(), sweep_interval, shutdown_tx.subscribe()).run(),
    );

    let addr = format!("{}:{}", config.network.bind, config.network.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", addr))?;

    let mut api_task = {
        let state = rendezvous_api::ApiState::new(registry.clone(), sweep_interval);
        tokio::spawn(rendezvous_api::serve(
            listener,
            state,
            shutdown_tx.subscribe(),
        ))
    };

    // ── Wait for exit ────────────────────────────────────────────────────────

    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv() => tracing::info!("shutting down"),
        r = reaper_task        => tracing::error!("reaper exited: {:?}", r),
        r = &mut api_task      => tracing::error!("API server exited: {:?}", r),
    }

    // Let the API drain in-flight requests before exiting.
    let _ = shutdown_tx.send(());
    if !api_task.is_finished() {
        match api_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "API server failed during shutdown"),
            Err(e) => tracing::error!(error = %e, "API task panicked"),
        }
    }

    tracing::info!(communities = registry.count().await, "rendezvousd stopped");
    Ok(())
}
