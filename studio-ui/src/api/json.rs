//! Read-only JSON API over products, settings and videos

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use studio_common::db::{products, settings, videos, Product, Settings, Video};

use crate::api::buildinfo::get_build_info;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::{ApiResult, AppState};

/// Query parameters for product listing
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Title substring filter
    pub q: Option<String>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub query: String,
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: i64,
    pub ready: i64,
    pub videos: i64,
}

/// GET /api/products?q=&page=
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> ApiResult<Json<ProductListResponse>> {
    let Query(query) = query?;
    let q = query.q.unwrap_or_default().trim().to_string();
    let filter = Some(q.as_str());

    let total_results = products::count_products(&state.db, filter).await?;
    let pagination = calculate_pagination(total_results, query.page);
    let items =
        products::list_products_page(&state.db, filter, PAGE_SIZE, pagination.offset).await?;

    Ok(Json(ProductListResponse {
        query: q,
        total_results,
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        products: items,
    }))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    Ok(Json(products::get_product(&state.db, id).await?))
}

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<Settings>> {
    Ok(Json(settings::load_settings(&state.db).await?))
}

/// GET /api/videos
pub async fn list_videos(State(state): State<AppState>) -> ApiResult<Json<Vec<Video>>> {
    Ok(Json(videos::list_videos(&state.db).await?))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    Ok(Json(StatsResponse {
        total: products::count_products(&state.db, None).await?,
        ready: products::count_ready(&state.db).await?,
        videos: videos::count_videos(&state.db).await?,
    }))
}

/// Build JSON API routes
pub fn json_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .route("/api/settings", get(get_settings))
        .route("/api/videos", get(list_videos))
        .route("/api/stats", get(get_stats))
        .route("/api/buildinfo", get(get_build_info))
}
