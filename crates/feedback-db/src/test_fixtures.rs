//! Test fixtures for database integration tests.
//!
//! Provides an in-memory database helper and a submission builder so the
//! integration suites share one setup path.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use feedback_db::test_fixtures::{memory_database, submission};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let db = memory_database().await;
//!     let id = db.feedback.insert(submission("bus", "12A", 2)).await.unwrap();
//!     // ...
//! }
//! ```

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::Database;
use feedback_core::{classify, NewFeedback, NewTicketFile};

/// Open a migrated in-memory database.
///
/// The pool is pinned to a single connection: every SQLite `:memory:`
/// connection is its own database, so a wider pool would hand out empty
/// databases to all but the first connection.
pub async fn memory_database() -> Database {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory database URL")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("failed to open in-memory database");

    let db = Database::new(pool);
    db.migrate().await.expect("failed to run migrations");
    db
}

/// A minimal valid submission for the given route, classified the same
/// way the ingestion handler would classify it.
pub fn submission(transport_type: &str, route: &str, rating: i64) -> NewFeedback {
    submission_with_problems(transport_type, route, rating, &[])
}

/// A submission carrying problem tags.
pub fn submission_with_problems(
    transport_type: &str,
    route: &str,
    rating: i64,
    problems: &[&str],
) -> NewFeedback {
    let problems: Vec<String> = problems.iter().map(|p| p.to_string()).collect();
    NewFeedback {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        transport_type: transport_type.to_string(),
        route: route.to_string(),
        journey: "Station A to Station B".to_string(),
        rating,
        priority: classify(rating, &problems),
        problems,
        comments: String::new(),
        location_lat: None,
        location_lng: None,
        user_id: "anonymous".to_string(),
        has_ticket: false,
        ticket_name: None,
        ticket_ref: None,
        ticket_type: None,
        ticket_size: None,
    }
}

/// A small ticket file owned by `feedback_id`.
pub fn ticket(feedback_id: Uuid) -> NewTicketFile {
    let content = b"fake ticket image bytes".to_vec();
    NewTicketFile {
        id: Uuid::new_v4(),
        feedback_id,
        filename: "ticket.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        size_bytes: content.len() as i64,
        content,
    }
}
