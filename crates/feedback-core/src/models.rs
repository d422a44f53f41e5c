//! Core data models for the transit feedback service.
//!
//! These types are shared across all service crates and represent the
//! persisted entities plus the aggregate shapes served to the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// =============================================================================
// ENUMS
// =============================================================================

/// Workflow status of a feedback entry.
///
/// Transitions are monotonic by convention only; the store accepts any
/// assignment of a valid variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum FeedbackStatus {
    New,
    InProgress,
    Resolved,
}

impl FeedbackStatus {
    /// Parse a wire-format status string (`new`, `in_progress`, `resolved`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier assigned once at submission time by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// FEEDBACK
// =============================================================================

/// A persisted feedback entry, one row of the `feedback` table.
///
/// `problems` holds the raw comma-joined tag list exactly as stored;
/// use [`split_problems`] (or convert to [`FeedbackItem`]) to expand it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub transport_type: String,
    pub route: String,
    pub journey: String,
    pub rating: i64,
    pub problems: String,
    pub comments: String,
    pub status: FeedbackStatus,
    pub priority: Priority,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub user_id: String,
    pub has_ticket: bool,
    pub ticket_name: Option<String>,
    pub ticket_ref: Option<Uuid>,
    pub ticket_type: Option<String>,
    pub ticket_size: Option<i64>,
}

/// Wire representation of a feedback entry for list responses.
///
/// Expands `problems` into an array and adds a `ticket_url` when the
/// entry has a retrievable attachment.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackItem {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub transport_type: String,
    pub route: String,
    pub journey: String,
    pub rating: i64,
    pub problems: Vec<String>,
    pub comments: String,
    pub status: FeedbackStatus,
    pub priority: Priority,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub user_id: String,
    pub has_ticket: bool,
    pub ticket_name: Option<String>,
    pub ticket_type: Option<String>,
    pub ticket_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
}

impl From<FeedbackEntry> for FeedbackItem {
    fn from(entry: FeedbackEntry) -> Self {
        let ticket_url = if entry.has_ticket && entry.ticket_ref.is_some() {
            Some(format!("/api/ticket/{}", entry.id))
        } else {
            None
        };
        Self {
            ticket_url,
            problems: split_problems(&entry.problems),
            id: entry.id,
            timestamp: entry.timestamp,
            transport_type: entry.transport_type,
            route: entry.route,
            journey: entry.journey,
            rating: entry.rating,
            comments: entry.comments,
            status: entry.status,
            priority: entry.priority,
            location_lat: entry.location_lat,
            location_lng: entry.location_lng,
            user_id: entry.user_id,
            has_ticket: entry.has_ticket,
            ticket_name: entry.ticket_name,
            ticket_type: entry.ticket_type,
            ticket_size: entry.ticket_size,
        }
    }
}

/// Expand a comma-joined problem list into individual tags.
///
/// The empty string expands to an empty list; otherwise every
/// comma-separated segment is kept, duplicates included.
pub fn split_problems(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',').map(str::to_string).collect()
    }
}

// =============================================================================
// TICKET FILES
// =============================================================================

/// An uploaded ticket attachment, stored as an opaque blob.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketFile {
    pub id: Uuid,
    pub feedback_id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub content: Vec<u8>,
    pub upload_time: DateTime<Utc>,
}

// =============================================================================
// ROUTE HOTSPOTS
// =============================================================================

/// Aggregated complaint record for one (route, transport type) pair at a
/// fixed geographic point.
///
/// The id is TEXT rather than a UUID: seed rows carry fixed slugs while
/// aggregator-created rows use v4 UUID strings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RouteHotspot {
    pub id: String,
    pub route: String,
    pub transport_type: String,
    pub lat: f64,
    pub lng: f64,
    pub issue_count: i64,
    pub avg_rating: f64,
    pub last_updated: DateTime<Utc>,
}

// =============================================================================
// REPORTING
// =============================================================================

/// One day of the 7-day trailing submission series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
    /// Abbreviated weekday label, e.g. "Mon".
    pub date: String,
    pub count: i64,
}

/// Aggregate dashboard statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_feedback: i64,
    /// Mean rating over all entries, rounded to 1 decimal; 0 if no entries.
    pub avg_rating: f64,
    pub active_issues: i64,
    pub resolved_issues: i64,
    pub problem_distribution: HashMap<String, i64>,
    /// Exactly 7 entries, oldest first, current day last, zero-filled.
    pub daily_trends: Vec<DailyTrend>,
    pub transport_distribution: HashMap<String, i64>,
    pub files_uploaded: i64,
    pub total_file_size: i64,
}

/// One problematic route in the analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRoute {
    pub route: String,
    pub transport_type: String,
    pub complaint_count: i64,
    pub avg_rating: f64,
    /// Up to 3 distinct problem tags, first-seen order.
    pub common_problems: Vec<String>,
}

/// A recent upload in the file statistics report, joined with the owning
/// feedback's route classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentUpload {
    pub filename: String,
    pub file_type: String,
    pub upload_time: DateTime<Utc>,
    pub route: String,
    pub transport_type: String,
}

/// Upload counters and type histogram for the files dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStatsReport {
    pub total_files: i64,
    pub total_size: i64,
    pub file_types: HashMap<String, i64>,
    pub recent_uploads: Vec<RecentUpload>,
}
