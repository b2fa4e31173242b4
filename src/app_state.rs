use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::DbSettings, db::ConnectionProvider, error::DbResult};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub provider: Arc<ConnectionProvider>,
}

impl AppState {
    pub fn new(provider: ConnectionProvider) -> Self {
        AppState {
            provider: Arc::new(provider),
        }
    }

    /// Builds the provider and opens the connection once; a failure here is fatal to startup.
    pub async fn init(settings: DbSettings) -> DbResult<Self> {
        let app_state = AppState::new(ConnectionProvider::new(settings));
        app_state.provider.connection().await?;
        Ok(app_state)
    }
}
