//! Site-wide constants shared by the storefront pages.

use std::path::{Component, Path, PathBuf};

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

pub const BASE_URL: &str = "http://localhost/ecommerce-mvc/";
pub const UPLOAD_PATH: &str = "assets/uploads/";
/// 5 MiB.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub const WHATSAPP_NUMBER: &str = "+33123456789";
pub const FACEBOOK_PAGE: &str = "votre-page-facebook";

pub(super) fn get_router() -> Router {
    Router::new().route("/", get(site_info))
}

pub fn url_for(path: &str) -> String {
    format!("{BASE_URL}{}", path.trim_start_matches('/'))
}

pub fn upload_fits(len: u64) -> bool {
    len <= MAX_FILE_SIZE
}

/// Where an uploaded file named `file_name` is stored.
///
/// Only bare file names are accepted; anything that would leave the upload
/// directory yields `None`.
pub fn upload_destination(file_name: &str) -> Option<PathBuf> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Some(Path::new(UPLOAD_PATH).join(name)),
        _ => None,
    }
}

#[derive(Serialize)]
pub(crate) struct SiteInfo {
    base_url: &'static str,
    upload_path: &'static str,
    max_file_size: u64,
    whatsapp_number: &'static str,
    facebook_page: &'static str,
}

async fn site_info() -> impl IntoResponse {
    Json(SiteInfo {
        base_url: BASE_URL,
        upload_path: UPLOAD_PATH,
        max_file_size: MAX_FILE_SIZE,
        whatsapp_number: WHATSAPP_NUMBER,
        facebook_page: FACEBOOK_PAGE,
    })
}
