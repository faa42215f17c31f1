use crate::assets::{AssetRecord, AssetTable, analyze};
use crate::charts;
use crate::error::AppError;
use crate::server::Server;
use crate::storage::sanitize_filename;
use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Upload and per-file analysis routes.
pub fn create_asset_routes() -> Router<Server> {
    Router::new()
        .route("/assets", post(upload_assets))
        .route("/assets/{filename}", get(view_assets))
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub filename: String,
    pub analyzed_at: DateTime<Utc>,
    pub total_assets: usize,
    pub active_assets: usize,
    pub total_value: f64,
    pub expiring_count: usize,
    pub expiring: Vec<AssetRecord>,
    pub expiry_chart: Value,
}

/// Accept a multipart upload (`file` field), store it under its original
/// filename, and return the analysis for the fresh upload.
async fn upload_assets(
    State(server): State<Server>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or_default())?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

        server.store.save(&filename, &bytes).await?;
        info!("Stored uploaded asset sheet {} ({} bytes)", filename, bytes.len());

        let table = crate::assets::parse_asset_table(&bytes)?;
        return Ok(Json(build_analysis_response(filename, &table)));
    }

    Err(AppError::BadRequest("No file selected.".to_string()))
}

/// Re-analyze a previously uploaded sheet at the current wall clock.
async fn view_assets(
    State(server): State<Server>,
    Path(filename): Path<String>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let table = super::load_table(&server, &filename).await?;
    Ok(Json(build_analysis_response(filename, &table)))
}

fn build_analysis_response(filename: String, table: &AssetTable) -> AnalysisResponse {
    let now = Utc::now();
    let analysis = analyze(table, now);

    AnalysisResponse {
        filename,
        analyzed_at: now,
        total_assets: analysis.total_count,
        active_assets: analysis.active_count,
        total_value: analysis.total_value,
        expiring_count: analysis.expiring.len(),
        expiry_chart: charts::expiry_histogram(table),
        expiring: analysis.expiring,
    }
}
