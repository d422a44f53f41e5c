//! Feedback entry repository implementation.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use feedback_core::{
    Error, FeedbackEntry, FeedbackFilter, FeedbackRepository, FeedbackStatus, NewFeedback, Result,
};

/// Default result cap for listing when the caller does not pass one.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// SQLite implementation of [`FeedbackRepository`].
#[derive(Clone)]
pub struct SqliteFeedbackRepository {
    pool: SqlitePool,
}

impl SqliteFeedbackRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn insert(&self, feedback: NewFeedback) -> Result<Uuid> {
        let problems = feedback.problems.join(",");

        sqlx::query(
            r#"
            INSERT INTO feedback
                (id, timestamp, transport_type, route, journey, rating, problems,
                 comments, status, priority, location_lat, location_lng, user_id,
                 has_ticket, ticket_name, ticket_ref, ticket_type, ticket_size)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.timestamp)
        .bind(&feedback.transport_type)
        .bind(&feedback.route)
        .bind(&feedback.journey)
        .bind(feedback.rating)
        .bind(&problems)
        .bind(&feedback.comments)
        .bind(FeedbackStatus::New)
        .bind(feedback.priority)
        .bind(feedback.location_lat)
        .bind(feedback.location_lng)
        .bind(&feedback.user_id)
        .bind(feedback.has_ticket)
        .bind(&feedback.ticket_name)
        .bind(feedback.ticket_ref)
        .bind(&feedback.ticket_type)
        .bind(feedback.ticket_size)
        .execute(&self.pool)
        .await?;

        debug!(
            subsystem = "database",
            component = "feedback",
            op = "insert",
            feedback_id = %feedback.id,
            priority = %feedback.priority,
            "Feedback entry inserted"
        );
        Ok(feedback.id)
    }

    async fn list(&self, filter: FeedbackFilter) -> Result<Vec<FeedbackEntry>> {
        let mut query = String::from("SELECT * FROM feedback WHERE 1=1");

        if filter.transport_type.is_some() {
            query.push_str(" AND transport_type = ?");
        }
        if filter.priority.is_some() {
            query.push_str(" AND priority = ?");
        }
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        query.push_str(" ORDER BY timestamp DESC LIMIT ?");

        let mut q = sqlx::query_as::<_, FeedbackEntry>(&query);
        if let Some(transport_type) = &filter.transport_type {
            q = q.bind(transport_type);
        }
        if let Some(priority) = &filter.priority {
            q = q.bind(priority);
        }
        if let Some(status) = &filter.status {
            q = q.bind(status);
        }
        q = q.bind(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT));

        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn update_status(&self, id: Uuid, status: FeedbackStatus) -> Result<()> {
        let result = sqlx::query("UPDATE feedback SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Feedback not found".to_string()));
        }

        debug!(
            subsystem = "database",
            component = "feedback",
            op = "update_status",
            feedback_id = %id,
            status = %status,
            "Feedback status updated"
        );
        Ok(())
    }
}
