// tests/common/mod.rs

#![allow(dead_code)]

use moodle_core::{MoodleConfig, RetryPolicy};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LOGIN: &str = include_str!("../fixtures/login.html");
pub const LOGIN_REJECTED: &str = include_str!("../fixtures/login_rejected.html");
pub const LOGIN_NO_TOKEN: &str = include_str!("../fixtures/login_no_token.html");
pub const DASHBOARD: &str = include_str!("../fixtures/dashboard.html");
pub const CALENDAR: &str = include_str!("../fixtures/calendar.html");
pub const CALENDAR_EMPTY: &str = include_str!("../fixtures/calendar_empty.html");

pub const USERNAME: &str = "2300290140001";
pub const PASSWORD: &str = "correct-horse";

/// Config pointing at the mock server, with fast retries.
pub fn config_for(server: &MockServer) -> MoodleConfig {
    let mut config = MoodleConfig::with_base_url(server.uri());
    config.timeout_secs = 5;
    config.retry = RetryPolicy {
        max_retries: 1,
        min_backoff_ms: 1,
        max_backoff_ms: 5,
    };
    config
}

/// Like [`config_for`], with a one second request timeout.
pub fn short_timeout_config_for(server: &MockServer) -> MoodleConfig {
    let mut config = config_for(server);
    config.timeout_secs = 1;
    config
}

/// A page that arrives well after [`short_timeout_config_for`] gives up.
pub fn stalled(body: &str) -> ResponseTemplate {
    html(body).set_delay(Duration::from_secs(3))
}

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

/// Login form plus a POST handler that accepts only the right token and user.
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login/index.php"))
        .respond_with(html(LOGIN))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login/index.php"))
        .and(body_string_contains("logintoken=tok123"))
        .and(body_string_contains(format!("username={}", USERNAME)))
        .respond_with(html(DASHBOARD))
        .mount(server)
        .await;
}
