use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::context::AppContext;
use crate::error::BootstrapError;
use crate::router::{AppState, app_router};

/// Resolve the listen address and open a context with the schema in place.
/// Fails before any socket is bound when `PORT` is missing.
pub async fn prepare(config: &Config) -> Result<(AppContext, SocketAddr), BootstrapError> {
    let addr = config.listen_addr()?;
    let ctx = AppContext::open(config).await?;
    ctx.ensure_schema().await?;
    Ok((ctx, addr))
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, BootstrapError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| BootstrapError::Bind { addr, source })
}

/// Serve the application on `listener` until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, ctx: AppContext, shutdown: F) -> Result<(), BootstrapError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = app_router(AppState::new(ctx.pool().clone()));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;
    ctx.close().await;
    served?;
    info!("HTTP server stopped");
    Ok(())
}

pub async fn serve(config: &Config) -> Result<(), BootstrapError> {
    let (ctx, addr) = prepare(config).await?;
    let listener = bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    run(listener, ctx, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
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
                warn!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
