//! studio-ui library - Affiliate Studio web server
//!
//! Local single-user server for organizing affiliate products, generating
//! captions and hashtags, exporting zip bundles and tracking video views.

pub mod api;
pub mod error;
pub mod flash;
pub mod pagination;
pub mod services;

pub use crate::error::{ApiError, ApiResult, PageError, PageResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::time::Duration;
use studio_common::config::NetworkConfig;
use tower_http::trace::TraceLayer;

use crate::services::{ImageDownloader, ShopeeClient};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Outbound HTTP client (Shopee pages, product images)
    pub http: reqwest::Client,
    /// Outbound HTTP settings
    pub network: NetworkConfig,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, network: NetworkConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(network.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            db,
            http,
            network,
            startup_time: Utc::now(),
        })
    }

    pub fn shopee_client(&self) -> ShopeeClient {
        ShopeeClient::new(self.http.clone(), self.network.image_cdn_base.clone())
    }

    pub fn image_downloader(&self) -> ImageDownloader {
        ImageDownloader::new(self.http.clone(), self.network.download_concurrency)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML pages and form posts
        .merge(api::ui_routes())
        // JSON API
        .merge(api::json_routes())
        .merge(api::health_routes())
        .fallback(api::ui::not_found_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
