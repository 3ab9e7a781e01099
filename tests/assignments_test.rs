// tests/assignments_test.rs

mod common;

use chrono::{NaiveDate, NaiveDateTime};
use common::*;
use moodle_core::{
    Assignment, AssignmentStatus, AssignmentsResult, AuthError, ClientState, Credentials,
    FailureKind, MoodleClient, Result, ScraperError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn june_2025() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

async fn mount_dashboard(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/my/"))
        .respond_with(html(DASHBOARD))
        .mount(server)
        .await;
}

async fn mount_calendar(server: &MockServer, body: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/calendar/view.php"))
        .and(query_param("view", "upcoming"))
        .respond_with(html(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> Result<MoodleClient> {
    MoodleClient::with_config(Credentials::new(USERNAME, PASSWORD), config_for(server))
}

fn assignment(title: &str, course: &str, status: AssignmentStatus, date: &str) -> Assignment {
    Assignment {
        title: title.into(),
        course: course.into(),
        status,
        date: date.into(),
    }
}

#[tokio::test]
async fn test_calendar_events_are_classified_and_annotated() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_dashboard(&server).await;
    mount_calendar(&server, CALENDAR, 1).await;

    let mut client = client_for(&server)?;
    let result = client.get_assignments_at(june_2025()).await?;

    assert_eq!(client.state(), ClientState::Succeeded);
    assert_eq!(
        result,
        AssignmentsResult {
            pending: vec![
                assignment(
                    "Portfolio website",
                    "Web Development-1 (Mr. Ankit Verma)",
                    AssignmentStatus::Pending,
                    "Monday, 12 January 2099, 11:59 PM",
                ),
                assignment(
                    "Reading response",
                    "Moodle Course",
                    AssignmentStatus::Pending,
                    "Upcoming",
                ),
            ],
            completed: vec![
                assignment("Lab record", "PH101B", AssignmentStatus::Done, "12 Jan 2020"),
                assignment(
                    "CSS quiz (submitted)",
                    "Web Development-1 (Mr. Ankit Verma)",
                    AssignmentStatus::Done,
                    "Monday, 12 January 2099",
                ),
            ],
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_empty_calendar_falls_back_to_timeline() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_dashboard(&server).await;
    mount_calendar(&server, CALENDAR_EMPTY, 1).await;

    let mut client = client_for(&server)?;
    let result = client.get_assignments_at(june_2025()).await?;

    assert_eq!(
        result.pending,
        vec![assignment(
            "Parser assignment",
            "Compiler Design (Dr. Neha Singh)",
            AssignmentStatus::Pending,
            "Monday, 12 January 2099, 11:59 PM",
        )]
    );
    assert_eq!(result.completed.len(), 1);
    assert_eq!(result.completed[0].title, "Lexer worksheet");

    Ok(())
}

#[tokio::test]
async fn test_repeated_runs_are_identical() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_dashboard(&server).await;
    mount_calendar(&server, CALENDAR, 2).await;

    let mut client = client_for(&server)?;
    let first = client.get_assignments_at(june_2025()).await?;
    let second = client.get_assignments_at(june_2025()).await?;

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    // The session is reused: one login POST for both runs.
    let posts = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 1);

    Ok(())
}

#[tokio::test]
async fn test_result_serializes_with_frontend_status_strings() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_dashboard(&server).await;
    mount_calendar(&server, CALENDAR, 1).await;

    let mut client = client_for(&server)?;
    let result = client.get_assignments_at(june_2025()).await?;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["pending"][0]["status"], "Left");
    assert_eq!(json["completed"][0]["status"], "Done");
    assert_eq!(json["pending"][0]["course"], "Web Development-1 (Mr. Ankit Verma)");

    Ok(())
}

#[tokio::test]
async fn test_expired_session_surfaces_as_auth_error() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    // Moodle answers an expired session by redirecting to the login form.
    Mock::given(method("GET"))
        .and(path("/my/"))
        .respond_with(ResponseTemplate::new(303).insert_header("location", "/login/index.php"))
        .mount(&server)
        .await;

    let mut client = client_for(&server)?;
    let err = client.get_assignments_at(june_2025()).await.unwrap_err();

    assert!(matches!(err, ScraperError::Auth(AuthError::SessionExpired)));
    assert_eq!(client.state(), ClientState::Failed(FailureKind::Auth));

    Ok(())
}

#[tokio::test]
async fn test_scrape_failure_degrades_to_empty_result() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/my/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut client = client_for(&server)?;
    let result = client.get_assignments_at(june_2025()).await?;

    assert!(result.is_empty());
    assert_eq!(client.state(), ClientState::Failed(FailureKind::Scrape));

    Ok(())
}

#[tokio::test]
async fn test_stalled_dashboard_times_out_after_one_retry() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/my/"))
        .respond_with(stalled(DASHBOARD))
        .expect(2)
        .mount(&server)
        .await;
    mount_calendar(&server, CALENDAR, 0).await;

    let mut client = MoodleClient::with_config(
        Credentials::new(USERNAME, PASSWORD),
        short_timeout_config_for(&server),
    )?;
    let result = client.get_assignments_at(june_2025()).await?;

    assert_eq!(result, AssignmentsResult::default());
    assert_eq!(client.state(), ClientState::Failed(FailureKind::Scrape));

    Ok(())
}
