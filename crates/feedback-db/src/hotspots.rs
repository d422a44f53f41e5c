//! Route hotspot repository with an atomic running-mean upsert.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use feedback_core::{HotspotRepository, Result, RouteHotspot};

/// SQLite implementation of [`HotspotRepository`].
#[derive(Clone)]
pub struct SqliteHotspotRepository {
    pool: SqlitePool,
}

impl SqliteHotspotRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotspotRepository for SqliteHotspotRepository {
    async fn record_observation(
        &self,
        route: &str,
        transport_type: &str,
        lat: f64,
        lng: f64,
        rating: i64,
    ) -> Result<()> {
        // Single conditional upsert keyed on UNIQUE(route, transport_type).
        // Every right-hand side in DO UPDATE evaluates against the
        // pre-update row, so the new rating folds into the old weighted
        // sum and concurrent submissions for one key cannot lose an
        // increment. Coordinates stay fixed at first observation.
        sqlx::query(
            r#"
            INSERT INTO route_hotspots
                (id, route, transport_type, lat, lng, issue_count, avg_rating, last_updated)
            VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            ON CONFLICT (route, transport_type) DO UPDATE SET
                issue_count  = issue_count + 1,
                avg_rating   = (avg_rating * issue_count + excluded.avg_rating)
                               / (issue_count + 1),
                last_updated = excluded.last_updated
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(route)
        .bind(transport_type)
        .bind(lat)
        .bind(lng)
        .bind(rating as f64)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(
            subsystem = "database",
            component = "hotspots",
            op = "record_observation",
            route = %route,
            transport_type = %transport_type,
            rating,
            "Hotspot observation recorded"
        );
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RouteHotspot>> {
        Ok(sqlx::query_as::<_, RouteHotspot>(
            "SELECT * FROM route_hotspots ORDER BY issue_count DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
