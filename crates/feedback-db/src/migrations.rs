//! Idempotent schema bootstrap and seed data.
//!
//! Every statement is safe to re-run on startup: tables are created with
//! `IF NOT EXISTS` and seed hotspots are inserted with `INSERT OR IGNORE`,
//! so seeded rows that have accumulated live observations are never reset.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use feedback_core::Result;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS feedback (
        id              TEXT PRIMARY KEY,
        timestamp       TEXT NOT NULL,
        transport_type  TEXT NOT NULL,
        route           TEXT NOT NULL,
        journey         TEXT NOT NULL,
        rating          INTEGER NOT NULL,
        problems        TEXT NOT NULL DEFAULT '',
        comments        TEXT NOT NULL DEFAULT '',
        status          TEXT NOT NULL DEFAULT 'new',
        priority        TEXT NOT NULL DEFAULT 'low',
        location_lat    REAL,
        location_lng    REAL,
        user_id         TEXT NOT NULL DEFAULT 'anonymous',
        has_ticket      INTEGER NOT NULL DEFAULT 0,
        ticket_name     TEXT,
        ticket_ref      TEXT,
        ticket_type     TEXT,
        ticket_size     INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS route_hotspots (
        id              TEXT PRIMARY KEY,
        route           TEXT NOT NULL,
        transport_type  TEXT NOT NULL,
        lat             REAL NOT NULL,
        lng             REAL NOT NULL,
        issue_count     INTEGER NOT NULL DEFAULT 0,
        avg_rating      REAL NOT NULL DEFAULT 0,
        last_updated    TEXT NOT NULL,
        UNIQUE (route, transport_type)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ticket_files (
        id              TEXT PRIMARY KEY,
        feedback_id     TEXT NOT NULL REFERENCES feedback (id),
        filename        TEXT NOT NULL,
        mime_type       TEXT NOT NULL,
        size_bytes      INTEGER NOT NULL,
        content         BLOB NOT NULL,
        upload_time     TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_feedback_timestamp ON feedback (timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_ticket_files_feedback ON ticket_files (feedback_id)",
];

/// Known stations pre-populated on the hotspot map.
///
/// (id, route, transport_type, lat, lng, issue_count, avg_rating)
/// Seeded rows behave identically to aggregator-created rows: their preset
/// average is folded into the running mean as if it were the true mean of
/// `issue_count` prior observations.
const SEED_HOTSPOTS: &[(&str, &str, &str, f64, f64, i64, f64)] = &[
    ("pune_station", "Pune Railway Station", "train", 18.5284, 73.8741, 15, 2.3),
    ("shivaji_nagar", "Shivaji Nagar Bus Station", "bus", 18.5309, 73.8520, 12, 2.8),
    ("kothrud", "Kothrud Bus Stop", "bus", 18.5074, 73.8077, 8, 3.2),
    ("camp_bus", "Camp Bus Station", "bus", 18.5089, 73.8938, 18, 2.1),
    ("hadapsar", "Hadapsar Metro Station", "metro", 18.5089, 73.9260, 5, 4.1),
    ("magarpatta", "Magarpatta Metro Station", "metro", 18.5158, 73.9298, 3, 4.5),
    ("pcmc", "PCMC Bus Station", "bus", 18.6298, 73.7997, 10, 2.9),
    ("pimpri", "Pimpri Bus Stop", "bus", 18.6298, 73.7997, 9, 3.1),
];

/// Create tables and indexes, then seed the fixed hotspot rows.
pub async fn run(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    let now = Utc::now();
    for (id, route, transport_type, lat, lng, issue_count, avg_rating) in SEED_HOTSPOTS {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO route_hotspots
                (id, route, transport_type, lat, lng, issue_count, avg_rating, last_updated)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(route)
        .bind(transport_type)
        .bind(lat)
        .bind(lng)
        .bind(issue_count)
        .bind(avg_rating)
        .bind(now)
        .execute(pool)
        .await?;
    }

    info!(
        subsystem = "database",
        component = "migrations",
        seed_hotspots = SEED_HOTSPOTS.len(),
        "Database schema initialized"
    );
    Ok(())
}
