//! Zip download

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Local;

use crate::services::build_export;
use crate::{AppState, PageError, PageResult};

/// POST /export_zip
pub async fn export_zip(State(state): State<AppState>) -> PageResult<Response> {
    let bundle = build_export(&state.db, &state.image_downloader(), Local::now())
        .await
        .map_err(|e| PageError::Internal(format!("Falha ao gerar o ZIP: {}", e)))?;

    tracing::info!(
        file = %bundle.file_name,
        products = bundle.product_count,
        "Export download"
    );

    let disposition = format!("attachment; filename=\"{}\"", bundle.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bundle.bytes,
    )
        .into_response())
}
