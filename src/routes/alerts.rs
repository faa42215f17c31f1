use crate::assets::analyze;
use crate::error::AppError;
use crate::mail::dispatch_alerts;
use crate::metrics;
use crate::server::Server;
use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

pub fn create_alert_routes() -> Router<Server> {
    Router::new().route("/alerts/{filename}", post(send_alerts))
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub filename: String,
    pub sent: usize,
    pub failed: usize,
    /// Transient user-facing summary of the run.
    pub message: String,
}

/// Dispatch one alert per currently-expiring asset in the named sheet.
/// Send failures are aggregated into counts, never surfaced as errors.
async fn send_alerts(
    State(server): State<Server>,
    Path(filename): Path<String>,
) -> Result<Json<AlertResponse>, AppError> {
    let table = super::load_table(&server, &filename).await?;
    let analysis = analyze(&table, Utc::now());

    let summary = dispatch_alerts(&analysis.expiring, server.mailer.as_ref()).await;
    metrics::track_alert_dispatch(summary.sent, summary.failed);
    info!(
        "Alert dispatch for {} complete: {} sent, {} failed",
        filename, summary.sent, summary.failed
    );

    let message = if summary.sent == 0 && summary.failed == 0 {
        "No assets are expiring within the next 30 days.".to_string()
    } else {
        let mut parts = Vec::new();
        if summary.sent > 0 {
            parts.push(format!("Sent {} alert emails successfully!", summary.sent));
        }
        if summary.failed > 0 {
            parts.push(format!("{} emails failed to send.", summary.failed));
        }
        parts.join(" ")
    };

    Ok(Json(AlertResponse {
        filename,
        sent: summary.sent,
        failed: summary.failed,
        message,
    }))
}
