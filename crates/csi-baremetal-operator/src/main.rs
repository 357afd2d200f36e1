use axum::{Json, Router, routing::get};
use csi_baremetal_operator::{config::OperatorConfig, controller};
use tokio::join;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal;

        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = tracing_subscriber::fmt::layer().compact();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let reg = Registry::default();
    reg.with(env_filter).with(logger).init();

    let config = OperatorConfig::from_env().inspect_err(|e| error!("{e}"))?;
    info!("Starting with {:?}", config);

    let controller = controller(config);

    // Liveness endpoint for the operator's own pod
    let app = Router::new()
        .route("/", get(|| async { "csi-baremetal-operator" }))
        .route("/health", get(|| async { Json("healthy") }));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;

    let serve = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    info!("Started listening on {:#?}", "0.0.0.0:8080");

    join!(controller, serve).1?;

    Ok(())
}
