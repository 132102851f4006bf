//! Server-rendered pages and form handlers

pub mod export;
pub mod home;
pub mod layout;
pub mod products;
pub mod settings;
pub mod videos;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{AppState, PageError};

/// Fallback for unknown routes
pub async fn not_found_page() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, layout::not_found_html())
}

/// Numeric record id from the path; an unparsable id is a missing page
#[derive(Debug, Clone, Copy)]
pub struct ItemId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(ItemId(id)),
            Err(rejection) => Err(PageError::NotFound(rejection.body_text())),
        }
    }
}

/// Parse an optional integer form field; blank means `default`
pub(crate) fn parse_form_int(value: &str, default: i64) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        Some(default)
    } else {
        value.parse().ok()
    }
}

/// Build page and form routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home_page))
        .route(
            "/settings",
            get(settings::settings_page).post(settings::save_settings),
        )
        .route("/products", get(products::products_page))
        .route(
            "/products/new",
            get(products::new_product_page).post(products::create_product),
        )
        .route("/products/from_shopee", post(products::import_from_shopee))
        .route(
            "/products/:id/edit",
            get(products::edit_product_page).post(products::update_product),
        )
        .route("/products/:id/delete", post(products::delete_product))
        .route("/products/:id/generate", post(products::generate_caption))
        .route("/generate_all", post(products::generate_all))
        .route("/copy/:id", get(products::copy_page))
        .route("/export_zip", post(export::export_zip))
        .route("/videos", get(videos::videos_page).post(videos::create_video))
        .route("/videos/:id/increment", post(videos::increment_views))
        .route("/videos/:id/reset", post(videos::reset_views))
        .route("/videos/:id/delete", post(videos::delete_video))
}
