mod app_state;
pub mod config;
pub mod db;
pub mod env;
pub mod error;
mod health;
pub mod site;

pub use app_state::AppState;
use axum::Router;

pub fn get_router(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::get_router(app_state))
        .nest("/site", site::get_router())
}
