//! Read-only aggregate projections for the operations dashboard.
//!
//! Counting and grouping run in SQL; problem-tag flattening and the 7-day
//! series are folded in memory so the series shape does not depend on the
//! stored timestamp text format.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use feedback_core::{
    DailyTrend, DashboardStats, FeedbackEntry, FeedbackStatus, FileStatsReport, ProblemRoute,
    RecentUpload, ReportsRepository, Result,
};

/// Length of the trailing daily submission series.
pub const TREND_DAYS: i64 = 7;

/// Number of problematic routes returned by the analytics report.
const TOP_ROUTES: i64 = 10;

/// Distinct problem tags reported per problematic route.
const TAGS_PER_ROUTE: usize = 3;

/// Recent uploads listed in the file statistics report.
const RECENT_UPLOADS: i64 = 10;

/// SQLite implementation of [`ReportsRepository`].
#[derive(Clone)]
pub struct SqliteReportsRepository {
    pool: SqlitePool,
}

impl SqliteReportsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportsRepository for SqliteReportsRepository {
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let total_feedback: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
            .fetch_one(&self.pool)
            .await?;

        let avg_rating: Option<f64> =
            sqlx::query_scalar("SELECT AVG(CAST(rating AS REAL)) FROM feedback")
                .fetch_one(&self.pool)
                .await?;

        let active_issues: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE status = ?")
                .bind(FeedbackStatus::New)
                .fetch_one(&self.pool)
                .await?;

        let resolved_issues: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE status = ?")
                .bind(FeedbackStatus::Resolved)
                .fetch_one(&self.pool)
                .await?;

        let problem_rows: Vec<String> =
            sqlx::query_scalar("SELECT problems FROM feedback WHERE problems != ''")
                .fetch_all(&self.pool)
                .await?;
        let mut problem_distribution: HashMap<String, i64> = HashMap::new();
        for raw in &problem_rows {
            for tag in raw.split(',').filter(|t| !t.is_empty()) {
                *problem_distribution.entry(tag.to_string()).or_insert(0) += 1;
            }
        }

        let timestamps: Vec<DateTime<Utc>> = sqlx::query_scalar("SELECT timestamp FROM feedback")
            .fetch_all(&self.pool)
            .await?;
        let daily_trends = build_daily_trends(&timestamps, Utc::now().date_naive());

        let transport_rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT transport_type, COUNT(*) FROM feedback GROUP BY transport_type",
        )
        .fetch_all(&self.pool)
        .await?;
        let transport_distribution = transport_rows.into_iter().collect();

        let files_uploaded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket_files")
            .fetch_one(&self.pool)
            .await?;
        let total_file_size: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(size_bytes), 0) FROM ticket_files")
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            total_feedback,
            avg_rating: round_to_tenth(avg_rating.unwrap_or(0.0)),
            active_issues,
            resolved_issues,
            problem_distribution,
            daily_trends,
            transport_distribution,
            files_uploaded,
            total_file_size,
        })
    }

    async fn route_analytics(&self) -> Result<Vec<ProblemRoute>> {
        let rows: Vec<(String, String, i64, f64, Option<String>)> = sqlx::query_as(
            r#"
            SELECT route, transport_type,
                   COUNT(*) AS complaint_count,
                   AVG(CAST(rating AS REAL)) AS avg_rating,
                   GROUP_CONCAT(problems, ',') AS all_problems
            FROM feedback
            WHERE rating <= 3
            GROUP BY route, transport_type
            ORDER BY complaint_count DESC, avg_rating ASC
            LIMIT ?
            "#,
        )
        .bind(TOP_ROUTES)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(route, transport_type, complaint_count, avg_rating, all_problems)| {
                    ProblemRoute {
                        route,
                        transport_type,
                        complaint_count,
                        avg_rating: round_to_tenth(avg_rating),
                        common_problems: distinct_problems(
                            all_problems.as_deref().unwrap_or(""),
                            TAGS_PER_ROUTE,
                        ),
                    }
                },
            )
            .collect())
    }

    async fn export_rows(&self) -> Result<Vec<FeedbackEntry>> {
        Ok(
            sqlx::query_as::<_, FeedbackEntry>(
                "SELECT * FROM feedback ORDER BY timestamp DESC",
            )
            .fetch_all(&self.pool)
            .await?,
        )
    }

    async fn file_stats(&self) -> Result<FileStatsReport> {
        let total_files: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket_files")
            .fetch_one(&self.pool)
            .await?;
        let total_size: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(size_bytes), 0) FROM ticket_files")
                .fetch_one(&self.pool)
                .await?;

        let type_rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT mime_type, COUNT(*) FROM ticket_files GROUP BY mime_type",
        )
        .fetch_all(&self.pool)
        .await?;
        let file_types = type_rows.into_iter().collect();

        let recent_rows: Vec<(String, String, DateTime<Utc>, String, String)> = sqlx::query_as(
            r#"
            SELECT tf.filename, tf.mime_type, tf.upload_time, f.route, f.transport_type
            FROM ticket_files tf
            JOIN feedback f ON tf.feedback_id = f.id
            ORDER BY tf.upload_time DESC
            LIMIT ?
            "#,
        )
        .bind(RECENT_UPLOADS)
        .fetch_all(&self.pool)
        .await?;

        let recent_uploads = recent_rows
            .into_iter()
            .map(
                |(filename, file_type, upload_time, route, transport_type)| RecentUpload {
                    filename,
                    file_type,
                    upload_time,
                    route,
                    transport_type,
                },
            )
            .collect();

        Ok(FileStatsReport {
            total_files,
            total_size,
            file_types,
            recent_uploads,
        })
    }
}

/// Round to one decimal place for dashboard display.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Bucket timestamps into the trailing [`TREND_DAYS`]-day series ending at
/// `today`, oldest first, zero-filled.
fn build_daily_trends(timestamps: &[DateTime<Utc>], today: NaiveDate) -> Vec<DailyTrend> {
    (0..TREND_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let count = timestamps
                .iter()
                .filter(|ts| ts.date_naive() == date)
                .count() as i64;
            DailyTrend {
                date: date.format("%a").to_string(),
                count,
            }
        })
        .collect()
}

/// First-seen-ordered distinct tags from a comma-joined tag soup, capped
/// at `limit`. Empty segments (from entries without problems) are skipped.
fn distinct_problems(joined: &str, limit: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for tag in joined.split(',') {
        if tag.is_empty() || seen.iter().any(|s| s == tag) {
            continue;
        }
        seen.push(tag.to_string());
        if seen.len() == limit {
            break;
        }
    }
    seen
}
