//! Ticket file repository. Attachments are stored as opaque blobs, one
//! per feedback entry by convention.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use feedback_core::{NewTicketFile, Result, TicketFile, TicketRepository};

/// SQLite implementation of [`TicketRepository`].
#[derive(Clone)]
pub struct SqliteTicketRepository {
    pool: SqlitePool,
}

impl SqliteTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepository {
    async fn store(&self, ticket: NewTicketFile) -> Result<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO ticket_files
                (id, feedback_id, filename, mime_type, size_bytes, content, upload_time)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(ticket.id)
        .bind(ticket.feedback_id)
        .bind(&ticket.filename)
        .bind(&ticket.mime_type)
        .bind(ticket.size_bytes)
        .bind(&ticket.content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(
            subsystem = "database",
            component = "tickets",
            op = "store",
            ticket_id = %ticket.id,
            feedback_id = %ticket.feedback_id,
            size_bytes = ticket.size_bytes,
            "Ticket file stored"
        );
        Ok(ticket.id)
    }

    async fn fetch_for_feedback(&self, feedback_id: Uuid) -> Result<Option<TicketFile>> {
        Ok(sqlx::query_as::<_, TicketFile>(
            "SELECT * FROM ticket_files WHERE feedback_id = ?",
        )
        .bind(feedback_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
