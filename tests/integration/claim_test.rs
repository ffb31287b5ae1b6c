//! Integration tests for coupon claims.

mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;

#[tokio::test]
async fn test_first_claim_succeeds() {
    let app = TestApp::new();

    let res = app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["coupon"]["code"], "SAVE10NOW");
    assert_eq!(res.body["coupon"]["discount"], "10%");
    assert_eq!(res.body["message"], "You've claimed: SAVE10NOW (10%)");
}

#[tokio::test]
async fn test_repeat_claim_same_browser_and_network_is_denied() {
    let app = TestApp::new();

    let first = app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.body["error"], true);
    assert_eq!(second.body["scope"], "session");
    assert_eq!(second.body["minutesRemaining"], 120);
    assert_eq!(
        second.body["message"],
        "Please wait 120 minutes before claiming another coupon from this browser."
    );
    assert_eq!(second.retry_after.as_deref(), Some("7200"));
}

#[tokio::test]
async fn test_new_browser_same_network_is_denied_by_network() {
    let app = TestApp::new();

    app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    let res = app.get("/api/coupon", "10.0.0.1", Some("beta")).await;

    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["scope"], "network");
    assert_eq!(res.body["minutesRemaining"], 60);
    assert_eq!(
        res.body["message"],
        "Please wait 60 minutes before claiming another coupon from this location."
    );
}

#[tokio::test]
async fn test_same_browser_new_network_is_denied_by_session() {
    let app = TestApp::new();

    app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    let res = app.get("/api/coupon", "10.0.0.2", Some("alpha")).await;

    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["scope"], "session");
    assert_eq!(res.body["minutesRemaining"], 120);
}

#[tokio::test]
async fn test_coupons_rotate_across_visitors() {
    let app = TestApp::new();
    let expected = [
        "SAVE10NOW",
        "FREESHIP22",
        "BUY1GET50",
        "WELCOME25",
        "FLASH15OFF",
        "SAVE10NOW",
    ];

    for (i, code) in expected.iter().enumerate() {
        let ip = format!("10.0.1.{}", i + 1);
        let session = format!("visitor-{i}");
        let res = app.get("/api/coupon", &ip, Some(&session)).await;
        assert_eq!(res.status, StatusCode::OK, "claim {i} should succeed");
        assert_eq!(res.body["coupon"]["code"], *code);
    }
}

#[tokio::test]
async fn test_denied_claim_does_not_advance_rotation() {
    let app = TestApp::new();

    app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    let denied = app.get("/api/coupon", "10.0.0.1", Some("beta")).await;
    assert_eq!(denied.status, StatusCode::TOO_MANY_REQUESTS);

    let next = app.get("/api/coupon", "10.0.0.2", Some("gamma")).await;
    assert_eq!(next.status, StatusCode::OK);
    assert_eq!(next.body["coupon"]["code"], "FREESHIP22");
}

#[tokio::test]
async fn test_forwarded_for_ignored_unless_trusted() {
    let app = TestApp::new();

    app.get_with_headers(
        "/api/coupon",
        "10.0.0.1",
        Some("alpha"),
        &[("x-forwarded-for", "203.0.113.7")],
    )
    .await;
    // Same peer, different forwarded address: still the same network.
    let res = app
        .get_with_headers(
            "/api/coupon",
            "10.0.0.1",
            Some("beta"),
            &[("x-forwarded-for", "203.0.113.8")],
        )
        .await;

    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["scope"], "network");
}

#[tokio::test]
async fn test_forwarded_for_used_when_trusted() {
    let mut config = helpers::test_config();
    config.server.trust_forwarded_for = true;
    let app = TestApp::with_config(config);

    app.get_with_headers(
        "/api/coupon",
        "10.0.0.1",
        Some("alpha"),
        &[("x-forwarded-for", "203.0.113.7")],
    )
    .await;
    let res = app
        .get_with_headers(
            "/api/coupon",
            "10.0.0.1",
            Some("beta"),
            &[("x-forwarded-for", "203.0.113.8, 10.0.0.1")],
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["coupon"]["code"], "FREESHIP22");
}

#[tokio::test]
async fn test_custom_windows_reported_in_denial() {
    let mut config = helpers::test_config();
    config.coupons.network_window_minutes = 5;
    config.coupons.session_window_minutes = 3;
    let app = TestApp::with_config(config);

    app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    let res = app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;

    // Network restriction outlasts the session one here.
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["scope"], "network");
    assert_eq!(res.body["minutesRemaining"], 5);
}

#[tokio::test]
async fn test_ledger_health_reports_cursor_and_entries() {
    let app = TestApp::new();

    app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    app.get("/api/coupon", "10.0.0.2", Some("beta")).await;

    let res = app.get("/api/health/ledger", "10.0.0.9", Some("ops")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"]["pool_size"], 5);
    assert_eq!(res.body["data"]["cursor"], 2);
    assert_eq!(res.body["data"]["network_entries"], 2);
    assert_eq!(res.body["data"]["session_entries"], 2);
}
