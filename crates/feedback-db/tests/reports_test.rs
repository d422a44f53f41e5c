//! Integration tests for the dashboard reporting repository.

use chrono::{Duration, Utc};

use feedback_db::test_fixtures::{
    memory_database, submission, submission_with_problems, ticket,
};
use feedback_db::{FeedbackRepository, FeedbackStatus, ReportsRepository, TicketRepository};

#[tokio::test]
async fn test_dashboard_stats_empty_store() {
    let db = memory_database().await;

    let stats = db.reports.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_feedback, 0);
    assert_eq!(stats.avg_rating, 0.0);
    assert_eq!(stats.active_issues, 0);
    assert_eq!(stats.resolved_issues, 0);
    assert!(stats.problem_distribution.is_empty());
    assert_eq!(stats.daily_trends.len(), 7);
    assert!(stats.daily_trends.iter().all(|t| t.count == 0));
    assert_eq!(stats.files_uploaded, 0);
    assert_eq!(stats.total_file_size, 0);
}

#[tokio::test]
async fn test_dashboard_stats_counts_and_rounded_mean() {
    let db = memory_database().await;

    db.feedback.insert(submission("bus", "R1", 1)).await.unwrap();
    db.feedback.insert(submission("bus", "R2", 2)).await.unwrap();
    let id = db.feedback.insert(submission("train", "R3", 2)).await.unwrap();
    db.feedback
        .update_status(id, FeedbackStatus::Resolved)
        .await
        .unwrap();

    let stats = db.reports.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_feedback, 3);
    // mean of 1, 2, 2 is 1.666..., rounded to one decimal.
    assert_eq!(stats.avg_rating, 1.7);
    assert_eq!(stats.active_issues, 2);
    assert_eq!(stats.resolved_issues, 1);
    assert_eq!(stats.transport_distribution.get("bus"), Some(&2));
    assert_eq!(stats.transport_distribution.get("train"), Some(&1));
}

#[tokio::test]
async fn test_dashboard_stats_problem_distribution_flattens_tags() {
    let db = memory_database().await;

    db.feedback
        .insert(submission_with_problems("bus", "R1", 2, &["delay", "crowding"]))
        .await
        .unwrap();
    db.feedback
        .insert(submission_with_problems("bus", "R2", 3, &["delay"]))
        .await
        .unwrap();
    db.feedback.insert(submission("bus", "R3", 5)).await.unwrap();

    let stats = db.reports.dashboard_stats().await.unwrap();
    assert_eq!(stats.problem_distribution.get("delay"), Some(&2));
    assert_eq!(stats.problem_distribution.get("crowding"), Some(&1));
    assert_eq!(stats.problem_distribution.len(), 2);
}

#[tokio::test]
async fn test_daily_trends_sum_matches_window() {
    let db = memory_database().await;

    let mut yesterday = submission("bus", "R1", 4);
    yesterday.timestamp = Utc::now() - Duration::days(1);
    db.feedback.insert(yesterday).await.unwrap();
    db.feedback.insert(submission("bus", "R2", 4)).await.unwrap();

    let stats = db.reports.dashboard_stats().await.unwrap();
    assert_eq!(stats.daily_trends.len(), 7);
    let total: i64 = stats.daily_trends.iter().map(|t| t.count).sum();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_dashboard_stats_file_counters() {
    let db = memory_database().await;

    let id = db.feedback.insert(submission("bus", "R1", 2)).await.unwrap();
    let t = ticket(id);
    let size = t.size_bytes;
    db.tickets.store(t).await.unwrap();

    let stats = db.reports.dashboard_stats().await.unwrap();
    assert_eq!(stats.files_uploaded, 1);
    assert_eq!(stats.total_file_size, size);
}

#[tokio::test]
async fn test_route_analytics_excludes_good_ratings() {
    let db = memory_database().await;

    db.feedback.insert(submission("bus", "R1", 3)).await.unwrap();
    db.feedback.insert(submission("bus", "R2", 4)).await.unwrap();
    db.feedback.insert(submission("bus", "R3", 5)).await.unwrap();

    let routes = db.reports.route_analytics().await.unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].route, "R1");
}

#[tokio::test]
async fn test_route_analytics_ordering_and_grouping() {
    let db = memory_database().await;

    // R1/bus: two complaints, mean 2.5. R2/bus: one complaint, mean 1.0.
    // R3/bus: one complaint, mean 3.0.
    db.feedback
        .insert(submission_with_problems("bus", "R1", 2, &["delay"]))
        .await
        .unwrap();
    db.feedback
        .insert(submission_with_problems("bus", "R1", 3, &["crowding", "delay"]))
        .await
        .unwrap();
    db.feedback.insert(submission("bus", "R2", 1)).await.unwrap();
    db.feedback.insert(submission("bus", "R3", 3)).await.unwrap();

    let routes = db.reports.route_analytics().await.unwrap();
    assert_eq!(routes.len(), 3);

    // Highest complaint count first.
    assert_eq!(routes[0].route, "R1");
    assert_eq!(routes[0].complaint_count, 2);
    assert_eq!(routes[0].avg_rating, 2.5);
    assert_eq!(routes[0].common_problems, vec!["delay", "crowding"]);

    // Ties on count order by mean rating ascending.
    assert_eq!(routes[1].route, "R2");
    assert_eq!(routes[2].route, "R3");
}

#[tokio::test]
async fn test_route_analytics_caps_distinct_problems_at_three() {
    let db = memory_database().await;

    db.feedback
        .insert(submission_with_problems(
            "bus",
            "R1",
            2,
            &["delay", "crowding", "dirty", "staff"],
        ))
        .await
        .unwrap();

    let routes = db.reports.route_analytics().await.unwrap();
    assert_eq!(routes[0].common_problems.len(), 3);
    assert_eq!(routes[0].common_problems, vec!["delay", "crowding", "dirty"]);
}

#[tokio::test]
async fn test_export_rows_newest_first() {
    let db = memory_database().await;

    let mut older = submission("bus", "older", 4);
    older.timestamp = Utc::now() - Duration::hours(2);
    let mut newer = submission("bus", "newer", 4);
    newer.timestamp = Utc::now();

    db.feedback.insert(older).await.unwrap();
    db.feedback.insert(newer).await.unwrap();

    let rows = db.reports.export_rows().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].route, "newer");
    assert_eq!(rows[1].route, "older");
}

#[tokio::test]
async fn test_file_stats_histogram_and_recent_join() {
    let db = memory_database().await;

    let id_a = db.feedback.insert(submission("bus", "R1", 2)).await.unwrap();
    let id_b = db.feedback.insert(submission("train", "R2", 3)).await.unwrap();

    let mut jpeg = ticket(id_a);
    jpeg.size_bytes = 100;
    let mut png = ticket(id_b);
    png.mime_type = "image/png".to_string();
    png.size_bytes = 50;

    db.tickets.store(jpeg).await.unwrap();
    db.tickets.store(png).await.unwrap();

    let report = db.reports.file_stats().await.unwrap();
    assert_eq!(report.total_files, 2);
    assert_eq!(report.total_size, 150);
    assert_eq!(report.file_types.get("image/jpeg"), Some(&1));
    assert_eq!(report.file_types.get("image/png"), Some(&1));
    assert_eq!(report.recent_uploads.len(), 2);

    let routes: Vec<&str> = report
        .recent_uploads
        .iter()
        .map(|u| u.route.as_str())
        .collect();
    assert!(routes.contains(&"R1"));
    assert!(routes.contains(&"R2"));
}
