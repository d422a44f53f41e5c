//! Repository traits for the transit feedback service.
//!
//! These traits define the store interface the HTTP layer programs
//! against, enabling pluggable backends and testability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// FEEDBACK REPOSITORY
// =============================================================================

/// A fully-validated feedback submission ready to persist.
///
/// The id and timestamp are generated by the ingestion handler before the
/// ticket attachment is stored, so the attachment can reference them.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub transport_type: String,
    pub route: String,
    pub journey: String,
    pub rating: i64,
    pub problems: Vec<String>,
    pub comments: String,
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

/// Filters for listing feedback.
///
/// `priority` and `status` are matched as raw strings: an unknown value
/// simply matches nothing, it is not a validation error.
#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter {
    pub transport_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    /// Maximum results; the repository applies a default of 50.
    pub limit: Option<i64>,
}

/// Repository for feedback entry reads and writes.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert a new feedback entry. New entries always start with status
    /// `new`. Returns the entry id.
    async fn insert(&self, feedback: NewFeedback) -> Result<Uuid>;

    /// List entries newest-first with optional filters.
    async fn list(&self, filter: FeedbackFilter) -> Result<Vec<FeedbackEntry>>;

    /// Update the workflow status of an entry.
    ///
    /// Returns `Error::NotFound` when the id matches no entry.
    async fn update_status(&self, id: Uuid, status: FeedbackStatus) -> Result<()>;
}

// =============================================================================
// HOTSPOT REPOSITORY
// =============================================================================

/// Repository for the per-route complaint aggregates behind the map view.
#[async_trait]
pub trait HotspotRepository: Send + Sync {
    /// Fold one rating observation into the hotspot for
    /// (`route`, `transport_type`).
    ///
    /// Creates the hotspot at the submitted coordinates on first
    /// observation; afterwards increments `issue_count` and advances the
    /// running mean, leaving the stored coordinates untouched. The update
    /// must be atomic per key (no read-then-write), so concurrent
    /// submissions for the same key cannot lose an increment.
    ///
    /// Caller obligation: both coordinates are present and non-zero. The
    /// ingestion handler performs that check before calling.
    async fn record_observation(
        &self,
        route: &str,
        transport_type: &str,
        lat: f64,
        lng: f64,
        rating: i64,
    ) -> Result<()>;

    /// All hotspots, ordered by issue count descending.
    async fn list(&self) -> Result<Vec<RouteHotspot>>;
}

// =============================================================================
// TICKET REPOSITORY
// =============================================================================

/// A decoded ticket attachment ready to persist.
#[derive(Debug, Clone)]
pub struct NewTicketFile {
    pub id: Uuid,
    pub feedback_id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub content: Vec<u8>,
}

/// Repository for uploaded ticket blobs.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Store a ticket file. Returns the file id.
    async fn store(&self, ticket: NewTicketFile) -> Result<Uuid>;

    /// Fetch the ticket attached to a feedback entry, if any.
    async fn fetch_for_feedback(&self, feedback_id: Uuid) -> Result<Option<TicketFile>>;
}

// =============================================================================
// REPORTS REPOSITORY
// =============================================================================

/// Read-only aggregate projections for the operations dashboard.
#[async_trait]
pub trait ReportsRepository: Send + Sync {
    /// Dashboard statistics: totals, status counts, problem frequency,
    /// 7-day trailing series, transport distribution, upload counters.
    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    /// Top 10 problematic routes among entries rated 3 or below.
    async fn route_analytics(&self) -> Result<Vec<ProblemRoute>>;

    /// Every feedback entry newest-first, for CSV export.
    async fn export_rows(&self) -> Result<Vec<FeedbackEntry>>;

    /// Upload counters, mime-type histogram, and the 10 most recent
    /// uploads joined with their owning feedback's route.
    async fn file_stats(&self) -> Result<FileStatsReport>;
}
