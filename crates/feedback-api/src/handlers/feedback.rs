//! Feedback ingestion, listing, and status updates.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use feedback_core::{
    classify, FeedbackFilter, FeedbackItem, FeedbackRepository, FeedbackStatus,
    HotspotRepository, NewFeedback, NewTicketFile, TicketRepository,
};

use crate::{ApiError, AppState};

/// An attached ticket file as submitted by the dashboard.
#[derive(Debug, Deserialize)]
pub struct TicketPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: i64,
    /// Base64 content, optionally prefixed with a comma-delimited
    /// data-URL header (`data:image/png;base64,...`).
    pub data: String,
}

/// Inbound feedback submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub transport_type: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub journey: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub has_ticket: Option<bool>,
    #[serde(default)]
    pub ticket_name: Option<String>,
    #[serde(default)]
    pub ticket_data: Option<TicketPayload>,
}

/// First required field that is missing or empty, checked in fixed order.
/// Returns the JSON field name used in the 400 response.
fn first_missing_field(req: &SubmitFeedbackRequest) -> Option<&'static str> {
    if req.transport_type.as_deref().map_or(true, str::is_empty) {
        return Some("transportType");
    }
    if req.route.as_deref().map_or(true, str::is_empty) {
        return Some("route");
    }
    if req.journey.as_deref().map_or(true, str::is_empty) {
        return Some("journey");
    }
    if req.rating.unwrap_or(0) == 0 {
        return Some("rating");
    }
    None
}

/// Decode a base64 attachment body, stripping an optional data-URL header
/// up to the first comma.
fn decode_ticket_data(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let encoded = match data.split_once(',') {
        Some((_header, rest)) => rest,
        None => data,
    };
    base64::engine::general_purpose::STANDARD.decode(encoded)
}

/// `POST /api/feedback`
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(field) = first_missing_field(&req) {
        return Err(ApiError::BadRequest(format!(
            "Missing required field: {field}"
        )));
    }

    let rating = req.rating.unwrap_or(0);
    if !(1..=5).contains(&rating) {
        return Err(ApiError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let id = Uuid::new_v4();
    let priority = classify(rating, &req.problems);

    // Decode the attachment up front; a failure drops the attachment but
    // never the submission.
    let ticket = req.ticket_data.as_ref().and_then(|payload| {
        match decode_ticket_data(&payload.data) {
            Ok(content) => Some(NewTicketFile {
                id: Uuid::new_v4(),
                feedback_id: id,
                filename: payload.name.clone(),
                mime_type: payload.mime_type.clone(),
                size_bytes: payload.size,
                content,
            }),
            Err(err) => {
                warn!(feedback_id = %id, error = %err, "Discarding ticket attachment that failed to decode");
                None
            }
        }
    });

    let feedback = NewFeedback {
        id,
        timestamp: Utc::now(),
        transport_type: req.transport_type.clone().unwrap_or_default(),
        route: req.route.clone().unwrap_or_default(),
        journey: req.journey.clone().unwrap_or_default(),
        rating,
        problems: req.problems.clone(),
        comments: req.comments.clone().unwrap_or_default(),
        priority,
        location_lat: req.latitude,
        location_lng: req.longitude,
        user_id: req
            .user_id
            .clone()
            .unwrap_or_else(|| "anonymous".to_string()),
        has_ticket: req.has_ticket.unwrap_or(false),
        ticket_name: req.ticket_name.clone(),
        ticket_ref: ticket.as_ref().map(|t| t.id),
        ticket_type: req.ticket_data.as_ref().map(|t| t.mime_type.clone()),
        ticket_size: req.ticket_data.as_ref().map(|t| t.size),
    };

    state.db.feedback.insert(feedback).await?;

    if let Some(ticket) = ticket {
        if let Err(err) = state.db.tickets.store(ticket).await {
            warn!(feedback_id = %id, error = %err, "Failed to store ticket attachment");
        }
    }

    // Fold into the route hotspot only when a usable location came along;
    // the aggregator relies on this check (zero coordinates mean "unset").
    if let (Some(lat), Some(lng)) = (req.latitude, req.longitude) {
        if lat != 0.0 && lng != 0.0 {
            let route = req.route.as_deref().unwrap_or_default();
            let transport_type = req.transport_type.as_deref().unwrap_or_default();
            if let Err(err) = state
                .db
                .hotspots
                .record_observation(route, transport_type, lat, lng, rating)
                .await
            {
                warn!(feedback_id = %id, error = %err, "Failed to update route hotspot");
            }
        }
    }

    info!(feedback_id = %id, priority = %priority, "Feedback submitted");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Feedback submitted successfully",
        "id": id,
    })))
}

/// Query parameters for listing feedback.
#[derive(Debug, Deserialize)]
pub struct ListFeedbackQuery {
    pub transport_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// `GET /api/feedback`
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<ListFeedbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state
        .db
        .feedback
        .list(FeedbackFilter {
            transport_type: query.transport_type,
            priority: query.priority,
            status: query.status,
            limit: query.limit,
        })
        .await?;

    let feedback: Vec<FeedbackItem> = entries.into_iter().map(FeedbackItem::from).collect();
    Ok(Json(serde_json::json!({ "feedback": feedback })))
}

/// Body for the status update endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// `PUT /api/feedback/:id/status`
pub async fn update_feedback_status(
    State(state): State<AppState>,
    Path(feedback_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = req
        .status
        .as_deref()
        .and_then(FeedbackStatus::parse)
        .ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?;

    // A malformed id cannot match any entry; report it the same way as an
    // unknown one.
    let id = feedback_id
        .parse::<Uuid>()
        .map_err(|_| ApiError::NotFound("Feedback not found".to_string()))?;

    state.db.feedback.update_status(id, status).await?;

    info!(feedback_id = %id, status = %status, "Feedback status updated");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Status updated successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let decoded = decode_ticket_data("aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_decode_strips_data_url_header() {
        let decoded = decode_ticket_data("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_decode_rejects_malformed_base64() {
        assert!(decode_ticket_data("!!!not-base64!!!").is_err());
    }

    #[test]
    fn test_missing_fields_reported_in_fixed_order() {
        let empty = SubmitFeedbackRequest {
            transport_type: None,
            route: None,
            journey: None,
            rating: None,
            problems: Vec::new(),
            comments: None,
            latitude: None,
            longitude: None,
            user_id: None,
            has_ticket: None,
            ticket_name: None,
            ticket_data: None,
        };
        assert_eq!(first_missing_field(&empty), Some("transportType"));

        let mut req = empty;
        req.transport_type = Some("bus".to_string());
        assert_eq!(first_missing_field(&req), Some("route"));
        req.route = Some("12A".to_string());
        assert_eq!(first_missing_field(&req), Some("journey"));
        req.journey = Some("A to B".to_string());
        assert_eq!(first_missing_field(&req), Some("rating"));
        req.rating = Some(3);
        assert_eq!(first_missing_field(&req), None);
    }

    #[test]
    fn test_empty_strings_and_zero_rating_count_as_missing() {
        let req = SubmitFeedbackRequest {
            transport_type: Some(String::new()),
            route: Some("12A".to_string()),
            journey: Some("A to B".to_string()),
            rating: Some(0),
            problems: Vec::new(),
            comments: None,
            latitude: None,
            longitude: None,
            user_id: None,
            has_ticket: None,
            ticket_name: None,
            ticket_data: None,
        };
        assert_eq!(first_missing_field(&req), Some("transportType"));

        let mut req = req;
        req.transport_type = Some("bus".to_string());
        assert_eq!(first_missing_field(&req), Some("rating"));
    }
}
