//! Dashboard reporting endpoints: statistics, hotspots, route analytics,
//! CSV export, and file upload statistics.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use feedback_core::{Error, FeedbackEntry, HotspotRepository, ReportsRepository};

use crate::{ApiError, AppState};

/// Fixed column order of the CSV export.
pub const CSV_HEADER: [&str; 12] = [
    "ID",
    "Timestamp",
    "Transport Type",
    "Route",
    "Journey",
    "Rating",
    "Problems",
    "Comments",
    "Status",
    "Priority",
    "Has Ticket",
    "Ticket Name",
];

/// `GET /api/stats`
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.db.reports.dashboard_stats().await?;
    Ok(Json(stats))
}

/// `GET /api/hotspots`
pub async fn get_hotspots(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let hotspots = state.db.hotspots.list().await?;
    Ok(Json(serde_json::json!({ "hotspots": hotspots })))
}

/// `GET /api/analytics/routes`
pub async fn get_route_analytics(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let routes = state.db.reports.route_analytics().await?;
    Ok(Json(serde_json::json!({ "problematic_routes": routes })))
}

/// `GET /api/files/stats`
pub async fn get_file_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.db.reports.file_stats().await?;
    Ok(Json(report))
}

/// `GET /api/export/csv`
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state.db.reports.export_rows().await?;
    let row_count = rows.len();
    let body = render_csv(&rows).map_err(ApiError::Internal)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"transport_feedback.csv\""),
    );

    info!(rows = row_count, "CSV export completed");
    Ok((StatusCode::OK, headers, body))
}

/// Serialize entries into the fixed 12-column CSV document.
fn render_csv(rows: &[FeedbackEntry]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| Error::Internal(e.to_string()))?;

    for entry in rows {
        writer
            .write_record([
                entry.id.to_string(),
                entry.timestamp.to_rfc3339(),
                entry.transport_type.clone(),
                entry.route.clone(),
                entry.journey.clone(),
                entry.rating.to_string(),
                entry.problems.clone(),
                entry.comments.clone(),
                entry.status.to_string(),
                entry.priority.to_string(),
                if entry.has_ticket { "Yes" } else { "No" }.to_string(),
                entry
                    .ticket_name
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
            ])
            .map_err(|e| Error::Internal(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Internal(e.to_string()))
}
