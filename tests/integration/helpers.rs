//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use coupondrop_api::AppState;
use coupondrop_core::config::AppConfig;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for inspecting the ledger directly
    pub state: AppState,
}

/// A parsed response from the test router
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// Raw body text, for non-JSON responses
    pub text: String,
    /// Value of the session cookie set on the response, if any
    pub session_cookie: Option<String>,
    /// Raw `Set-Cookie` header, if any
    pub set_cookie: Option<String>,
    pub retry_after: Option<String>,
}

impl TestApp {
    /// Create a test application with default coupons and windows.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application from a custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::from_config(config).expect("Failed to build app state");
        let router = coupondrop_api::build_app(state.clone());
        Self { router, state }
    }

    /// Send a GET request from `ip`, optionally presenting a session cookie.
    pub async fn get(&self, uri: &str, ip: &str, session: Option<&str>) -> TestResponse {
        self.get_with_headers(uri, ip, session, &[]).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(
        &self,
        uri: &str,
        ip: &str,
        session: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, format!("sessionId={session}"));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let mut request = builder.body(Body::empty()).unwrap();
        let addr: SocketAddr = format!("{ip}:51234").parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));

        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let session_cookie = set_cookie.as_deref().and_then(parse_session_cookie);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            text,
            session_cookie,
            set_cookie,
            retry_after,
        }
    }
}

/// Default configuration with static files off.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.static_files.enabled = false;
    config.coupons.sweep_interval_minutes = 0;
    config
}

fn parse_session_cookie(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    (name.trim() == "sessionId").then(|| value.trim().to_string())
}
