//! HTTP handlers for the transit feedback service.

pub mod feedback;
pub mod reports;
pub mod tickets;

use axum::response::Html;

/// Serve a simple API status page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Transit Feedback API</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; background: #f5f5f5; }
        .container { max-width: 800px; margin: 0 auto; background: white; padding: 40px; border-radius: 10px; }
        h1 { color: #333; text-align: center; }
        .endpoint { background: #f8f9fa; padding: 15px; margin: 10px 0; border-radius: 5px; border-left: 4px solid #007bff; }
        .method { background: #007bff; color: white; padding: 4px 8px; border-radius: 3px; font-size: 12px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Transit Feedback API</h1>
        <p>Backend server is active and ready to handle requests.</p>
        <div class="endpoint"><span class="method">POST</span> <strong>/api/feedback</strong><p>Submit new passenger feedback (with ticket upload support)</p></div>
        <div class="endpoint"><span class="method">GET</span> <strong>/api/feedback</strong><p>List feedback with optional filters (transport_type, priority, status, limit)</p></div>
        <div class="endpoint"><span class="method">PUT</span> <strong>/api/feedback/{id}/status</strong><p>Update feedback status (new, in_progress, resolved)</p></div>
        <div class="endpoint"><span class="method">GET</span> <strong>/api/ticket/{feedback_id}</strong><p>Download an uploaded ticket file</p></div>
        <div class="endpoint"><span class="method">GET</span> <strong>/api/stats</strong><p>Dashboard statistics</p></div>
        <div class="endpoint"><span class="method">GET</span> <strong>/api/hotspots</strong><p>Route hotspots for the map view</p></div>
        <div class="endpoint"><span class="method">GET</span> <strong>/api/analytics/routes</strong><p>Problematic route analytics</p></div>
        <div class="endpoint"><span class="method">GET</span> <strong>/api/export/csv</strong><p>Export all feedback as CSV</p></div>
        <div class="endpoint"><span class="method">GET</span> <strong>/api/files/stats</strong><p>File upload statistics</p></div>
    </div>
</body>
</html>
"#;
