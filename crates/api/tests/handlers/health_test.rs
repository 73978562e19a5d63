use serde_json::json;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_reports_open_event_connections() {
    let ctx = TestContext::new();
    let _subscription = ctx.events.add();
    let server = ctx.server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok", "eventConnections": 1 }));
}

#[tokio::test]
async fn test_version_reports_package() {
    let server = TestContext::new().server();

    let response = server.get("/version").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "name": "washbay-api", "version": env!("CARGO_PKG_VERSION") }));
}
