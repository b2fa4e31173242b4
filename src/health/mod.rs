mod db;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{app_state::AppState, db::ConnectionProvider, error::AppResult};

pub(super) fn get_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .with_state(app_state)
}

#[derive(Serialize)]
pub(crate) struct HealthReport {
    status: &'static str,
    server_time: DateTime<Utc>,
}

async fn health(
    State(provider): State<Arc<ConnectionProvider>>,
) -> AppResult<Json<HealthReport>> {
    let db = provider.connection().await?;
    Ok(Json(HealthReport {
        status: "ok",
        server_time: db.server_time().await?,
    }))
}
