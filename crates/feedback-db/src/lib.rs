//! # feedback-db
//!
//! SQLite persistence layer for the transit feedback service.
//!
//! This crate provides:
//! - Connection pool management
//! - Idempotent schema bootstrap with seeded map hotspots
//! - Repository implementations for feedback entries, ticket files,
//!   route hotspots, and dashboard reporting
//!
//! ## Example
//!
//! ```rust,ignore
//! use feedback_db::Database;
//! use feedback_core::{FeedbackFilter, FeedbackRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://transport_feedback.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let entries = db.feedback.list(FeedbackFilter::default()).await?;
//!     println!("{} entries", entries.len());
//!     Ok(())
//! }
//! ```

pub mod feedback;
pub mod hotspots;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod tickets;

// Test fixtures are always compiled so integration tests (in tests/)
// can share the in-memory database helper.
pub mod test_fixtures;

// Re-export core types
pub use feedback_core::*;

// Re-export repository implementations
pub use feedback::{SqliteFeedbackRepository, DEFAULT_LIST_LIMIT};
pub use hotspots::SqliteHotspotRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use reports::{SqliteReportsRepository, TREND_DAYS};
pub use tickets::SqliteTicketRepository;

/// Aggregated database access with repositories for all entities.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::SqlitePool,
    /// Feedback entry repository.
    pub feedback: SqliteFeedbackRepository,
    /// Route hotspot repository.
    pub hotspots: SqliteHotspotRepository,
    /// Ticket file repository.
    pub tickets: SqliteTicketRepository,
    /// Dashboard reporting repository.
    pub reports: SqliteReportsRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            feedback: SqliteFeedbackRepository::new(pool.clone()),
            hotspots: SqliteHotspotRepository::new(pool.clone()),
            tickets: SqliteTicketRepository::new(pool.clone()),
            reports: SqliteReportsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the database at `database_url` with default pool
    /// configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Run the idempotent schema bootstrap and seed data.
    pub async fn migrate(&self) -> Result<()> {
        migrations::run(&self.pool).await
    }
}
