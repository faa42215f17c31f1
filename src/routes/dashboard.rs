use crate::assets::analyze;
use crate::charts;
use crate::error::AppError;
use crate::server::Server;
use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

pub fn create_dashboard_routes() -> Router<Server> {
    Router::new().route("/dashboard/{filename}", get(dashboard))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub filename: String,
    pub total_assets: usize,
    pub expiring_count: usize,
    /// None when no row has a parsable acquisition date.
    pub average_age_days: Option<f64>,
    pub charts: DashboardCharts,
}

/// Three independent chart payloads; a missing source column yields a
/// placeholder figure rather than an error.
#[derive(Debug, Serialize)]
pub struct DashboardCharts {
    pub expiry: Value,
    pub category: Value,
    pub owner: Value,
}

async fn dashboard(
    State(server): State<Server>,
    Path(filename): Path<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let table = super::load_table(&server, &filename).await?;
    let analysis = analyze(&table, Utc::now());

    Ok(Json(DashboardResponse {
        filename,
        total_assets: analysis.total_count,
        expiring_count: analysis.expiring.len(),
        average_age_days: analysis.average_age_days,
        charts: DashboardCharts {
            expiry: charts::expiry_histogram(&table),
            category: charts::category_distribution(&table),
            owner: charts::owner_distribution(&table),
        },
    }))
}
