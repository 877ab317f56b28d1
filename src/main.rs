use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;

use scylla_todo::{config::AppConfig, db, logging::init_tracing, routes, state::AppState};

#[tokio::main]
async fn main() {
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load config: {err:#}");
            std::process::exit(1);
        }
    };
    init_tracing(&cfg.logging.rust_log);

    if let Err(err) = run(cfg).await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let store = db::connect(&cfg.database)
        .await
        .context("failed to connect to todo store")?;
    let state = AppState::new(cfg, store);

    let app = routes::app(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", state.config.general.host, state.config.general.port)
        .parse()
        .context("invalid host/port")?;
    tracing::info!(
        policy = ?state.config.listing.policy,
        backend = state.store.backend(),
        "listening on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped, closing todo store");
    if let Err(err) = state.store.close().await {
        tracing::warn!("failed to close todo store: {err}");
    }
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("received SIGTERM"),
                    _ = tokio::signal::ctrl_c() => tracing::info!("received SIGINT"),
                }
            }
            Err(err) => {
                tracing::warn!("failed to register SIGTERM handler: {err}");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.ok();
    }
}
