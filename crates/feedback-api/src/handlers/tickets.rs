//! Ticket file download.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;

use feedback_core::TicketRepository;

use crate::{ApiError, AppState};

/// `GET /api/ticket/:feedback_id`
///
/// Serves the raw stored bytes with the stored mime type. 404 when the
/// entry has no retrievable attachment (including malformed ids).
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(feedback_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let not_found = || ApiError::NotFound("Ticket not found".to_string());

    let id = feedback_id.parse::<Uuid>().map_err(|_| not_found())?;
    let ticket = state
        .db
        .tickets
        .fetch_for_feedback(id)
        .await?
        .ok_or_else(not_found)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        ticket
            .mime_type
            .parse()
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("inline; filename=\"{}\"", ticket.filename)
            .parse()
            .unwrap_or_else(|_| HeaderValue::from_static("inline")),
    );

    Ok((StatusCode::OK, headers, ticket.content))
}
