use std::sync::Arc;

use axum::http::Method;
use clap::Parser;
use singlefile_bridge::config::{Cli, Config};
use singlefile_bridge::handler::{AppState, router};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    match &args.env_file {
        Some(path) => {
            if let Err(e) = dotenvy::from_path(path) {
                eprintln!("failed to load env file {}: {}", path, e);
                std::process::exit(1);
            }
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    tracing_subscriber::fmt().json().init();
    tracing::info!("singlefile-bridge starting");

    let cfg = Arc::new(Config::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to load configuration");
        std::process::exit(1);
    }));

    let state = AppState::from_config(cfg.clone()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to build application state");
        std::process::exit(1);
    });
    if !state.notifier.enabled() {
        tracing::info!("alert notifications disabled, no credentials configured");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = router(state).layer(cors);

    let addr = cfg.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, %addr, "failed to bind listener");
        std::process::exit(1);
    });

    tracing::info!(
        %addr,
        max_asset_size_mb = cfg.max_asset_size_mb,
        upstream = %cfg.upstream_base_url,
        "singlefile-bridge listening"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }

    tracing::info!("singlefile-bridge shut down cleanly");
}

/// Resolves on SIGINT or SIGTERM. In-flight requests are allowed to finish;
/// they are not actively interrupted.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install ctrl+c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("termination signal received, draining in-flight requests");
}
