//! Integration tests for session cookies and claim status.

mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;

#[tokio::test]
async fn test_cookie_issued_to_new_visitor() {
    let app = TestApp::new();

    let res = app.get("/api/status", "10.0.0.1", None).await;

    assert_eq!(res.status, StatusCode::OK);
    let set_cookie = res.set_cookie.expect("session cookie should be set");
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=86400"));

    let session = res.session_cookie.expect("cookie value");
    assert_eq!(session.len(), 32);
    assert!(session.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_existing_cookie_not_reissued() {
    let app = TestApp::new();

    let res = app.get("/api/status", "10.0.0.1", Some("returning")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.set_cookie.is_none());
}

#[tokio::test]
async fn test_issued_cookie_carries_the_claim_restriction() {
    let app = TestApp::new();

    let first = app.get("/api/coupon", "10.0.0.1", None).await;
    assert_eq!(first.status, StatusCode::OK);
    let session = first.session_cookie.expect("cookie issued on first claim");

    // Different network, same browser.
    let second = app.get("/api/coupon", "10.0.0.2", Some(&session)).await;
    assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.body["scope"], "session");
}

#[tokio::test]
async fn test_status_for_unrestricted_visitor() {
    let app = TestApp::new();

    let res = app.get("/api/status", "10.0.0.1", Some("alpha")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["canClaim"], true);
    assert_eq!(res.body["networkWaitMinutes"], 0);
    assert_eq!(res.body["sessionWaitMinutes"], 0);
}

#[tokio::test]
async fn test_status_after_claim_reports_both_waits() {
    let app = TestApp::new();

    app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    let res = app.get("/api/status", "10.0.0.1", Some("alpha")).await;

    assert_eq!(res.body["canClaim"], false);
    assert_eq!(res.body["networkWaitMinutes"], 60);
    assert_eq!(res.body["sessionWaitMinutes"], 120);
}

#[tokio::test]
async fn test_status_reports_only_matching_identity() {
    let app = TestApp::new();

    app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;

    let other_browser = app.get("/api/status", "10.0.0.1", Some("beta")).await;
    assert_eq!(other_browser.body["canClaim"], false);
    assert_eq!(other_browser.body["networkWaitMinutes"], 60);
    assert_eq!(other_browser.body["sessionWaitMinutes"], 0);

    let other_network = app.get("/api/status", "10.0.0.2", Some("alpha")).await;
    assert_eq!(other_network.body["canClaim"], false);
    assert_eq!(other_network.body["networkWaitMinutes"], 0);
    assert_eq!(other_network.body["sessionWaitMinutes"], 120);
}

#[tokio::test]
async fn test_status_has_no_side_effects() {
    let app = TestApp::new();

    for _ in 0..3 {
        let res = app.get("/api/status", "10.0.0.1", Some("alpha")).await;
        assert_eq!(res.body["canClaim"], true);
    }

    let claim = app.get("/api/coupon", "10.0.0.1", Some("alpha")).await;
    assert_eq!(claim.status, StatusCode::OK);
    assert_eq!(claim.body["coupon"]["code"], "SAVE10NOW");
}

#[tokio::test]
async fn test_static_page_served_with_session_cookie() {
    let mut config = helpers::test_config();
    config.static_files.enabled = true;
    config.static_files.directory = format!("{}/public", env!("CARGO_MANIFEST_DIR"));
    let app = TestApp::with_config(config);

    let res = app.get("/", "10.0.0.1", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.text.contains("CouponDrop"));
    let set_cookie = res.set_cookie.expect("session cookie on the claim page");
    assert!(set_cookie.starts_with("sessionId="));
    assert!(set_cookie.contains("HttpOnly"));

    // The cookie issued with the page is the one the claim is keyed by.
    let session = res.session_cookie.expect("cookie value");
    let claim = app.get("/api/coupon", "10.0.0.1", Some(&session)).await;
    assert_eq!(claim.status, StatusCode::OK);
    assert!(claim.set_cookie.is_none());
}

#[tokio::test]
async fn test_missing_static_file_is_not_found() {
    let mut config = helpers::test_config();
    config.static_files.enabled = true;
    config.static_files.directory = format!("{}/public", env!("CARGO_MANIFEST_DIR"));
    let app = TestApp::with_config(config);

    let res = app.get("/missing.css", "10.0.0.1", Some("alpha")).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
