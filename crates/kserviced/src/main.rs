use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use kservice_api::{HttpApi, PodApiAdapter, axum};
use kservice_core::{KubePodClient, ServiceConfig};
use kservice_observe::{LoggerConfig, logger_init};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Environment (.env never overrides variables already set)
    let _ = dotenvy::dotenv();

    // 2) Logger
    let log_cfg = LoggerConfig::from_env().context("logger configuration")?;
    logger_init(&log_cfg).context("logger initialisation")?;

    // 3) Service configuration
    let cfg = Arc::new(ServiceConfig::from_env().context("service configuration")?);
    info!(
        port = cfg.listen_port,
        namespace = %cfg.worker_namespace,
        kubeconfig = %cfg.kubeconfig.display(),
        context = %cfg.kube_context,
        "configuration loaded"
    );

    // 4) Orchestrator client
    let client = KubePodClient::connect(&cfg)
        .await
        .context("orchestrator client")?;

    // 5) HTTP API
    let adapter = Arc::new(PodApiAdapter::new(cfg.clone(), Arc::new(client)));
    let app = HttpApi::new(adapter).router();

    let addr = cfg.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "kservice listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    info!("shutting down...");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c"),
        _ = terminate => info!("received SIGTERM"),
    }
}
