use std::time::Duration;

use anyhow::Context;
use axum::{
    error_handling::HandleErrorLayer,
    http::{Request, Response, StatusCode},
    BoxError,
};
use storefront_db::{config::Config, get_router, AppState};
use tokio::{self, net::TcpListener, signal};
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, info_span, Span};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    //Initiate logging
    tracing_subscriber::fmt::init();

    //Process environment first, then .env
    let Config {
        database,
        bind_addr,
    } = Config::load_default()?;

    let app_state = AppState::init(database)
        .await
        .context("database is unavailable")?;

    let app = get_router(app_state).layer((
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|err: BoxError| async move {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Unhandled error: {}", err),
                )
            }))
            .layer(BufferLayer::new(1024))
            .layer(RateLimitLayer::new(10_000, Duration::from_secs(1))),
        CatchPanicLayer::new(),
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let path = request.uri().to_string();

                info_span!(
                    "http_request",
                    method = ?request.method(),
                    path,
                )
            })
            .on_response(|_response: &Response<_>, latency: Duration, _span: &Span| {
                info!("latency = {:#?}", latency);
            }),
        // Graceful shutdown waits for in-flight requests, so bound them.
        TimeoutLayer::new(Duration::from_secs(10)),
    ));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
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
    info!("shutting down");
}
