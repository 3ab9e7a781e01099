use crate::assignment_scraper::AssignmentScraper;
use crate::auth;
use crate::config::MoodleConfig;
use crate::course_name;
use crate::due_date;
use crate::error::Result;
use crate::models::{
    Assignment, AssignmentStatus, AssignmentsResult, Credentials, RawAssignmentEvent,
};
use crate::parsers;
use crate::session::Session;
use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument, warn};

/// Which phase a failed run stopped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Auth,
    Scrape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Scraping,
    Succeeded,
    Failed(FailureKind),
}

/// Fetches one student's Moodle assignments.
///
/// Each client owns its own session and cookies. Create one per request;
/// clients for different students share nothing.
pub struct MoodleClient {
    session: Session,
    credentials: Credentials,
    state: ClientState,
}

impl MoodleClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, MoodleConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: MoodleConfig) -> Result<Self> {
        Ok(Self {
            session: Session::new(config)?,
            credentials,
            state: ClientState::Unauthenticated,
        })
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Logs into Moodle with the client's credentials.
    pub async fn login(&mut self) -> Result<()> {
        self.state = ClientState::Authenticating;
        match auth::authenticate(&mut self.session, &self.credentials).await {
            Ok(()) => {
                self.state = ClientState::Authenticated;
                Ok(())
            }
            Err(e) => {
                self.state = ClientState::Failed(FailureKind::Auth);
                Err(e.into())
            }
        }
    }

    /// Scrapes and classifies all assignments against the local clock.
    pub async fn get_assignments(&mut self) -> Result<AssignmentsResult> {
        self.get_assignments_at(Local::now().naive_local()).await
    }

    /// Scrapes and classifies all assignments, judging due dates against `now`.
    ///
    /// Login failures are returned as errors. Any other failure while
    /// scraping is logged and yields an empty result, since a student with
    /// nothing due looks the same.
    #[instrument(skip_all, fields(username = %self.credentials.username))]
    pub async fn get_assignments_at(&mut self, now: NaiveDateTime) -> Result<AssignmentsResult> {
        if !self.session.is_authenticated() {
            self.login().await?;
        }

        self.state = ClientState::Scraping;
        match self.scrape(now).await {
            Ok(result) => {
                info!(
                    pending = result.pending.len(),
                    completed = result.completed.len(),
                    "fetched Moodle assignments"
                );
                self.state = ClientState::Succeeded;
                Ok(result)
            }
            Err(e) if e.is_auth_failure() => {
                self.session.mark_unauthenticated();
                self.state = ClientState::Failed(FailureKind::Auth);
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, "Error fetching assignments, returning empty result");
                self.state = ClientState::Failed(FailureKind::Scrape);
                Ok(AssignmentsResult::default())
            }
        }
    }

    async fn scrape(&self, now: NaiveDateTime) -> Result<AssignmentsResult> {
        let scraper = AssignmentScraper::new(&self.session)?;

        let dashboard = scraper.fetch_dashboard().await?;
        let course_map = parsers::course_map::extract_course_map(&dashboard);
        info!("Found {} courses with teachers.", course_map.len());

        let raw = scraper.scrape_raw(&dashboard, &course_map).await?;
        Ok(partition(raw, now))
    }
}

/// Cleans, classifies and splits raw events, keeping scrape order.
///
/// Every input event lands in exactly one of the two lists.
pub fn partition(raw: Vec<RawAssignmentEvent>, now: NaiveDateTime) -> AssignmentsResult {
    let mut result = AssignmentsResult::default();

    for event in raw {
        let classification = due_date::classify(&event.date_text, &event.title, now);
        if let Some(failure) = &classification.parse_failure {
            warn!(title = %event.title, "{failure}; treating as pending");
        }

        let course =
            course_name::display(&course_name::clean(&event.course), event.teacher.as_deref());
        let assignment = Assignment {
            title: event.title,
            course,
            status: classification.status,
            date: event.date_text,
        };

        match assignment.status {
            AssignmentStatus::Pending => result.pending.push(assignment),
            AssignmentStatus::Done => result.completed.push(assignment),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn raw(title: &str, course: &str, teacher: Option<&str>, date: &str) -> RawAssignmentEvent {
        RawAssignmentEvent {
            title: title.into(),
            course: course.into(),
            teacher: teacher.map(Into::into),
            date_text: date.into(),
        }
    }

    #[test]
    fn partition_keeps_every_event_in_order() {
        let input = vec![
            raw("A", "Physics", None, "12 Jan 2030"),
            raw("B", "Physics", None, "12 Jan 2020"),
            raw("C", "Physics", None, "garbage not a date"),
            raw("D (submitted)", "Physics", None, "12 Jan 2030"),
            raw("E", "Physics", None, "See detailed view"),
        ];
        let result = partition(input, now());

        assert_eq!(result.len(), 5);
        let pending: Vec<_> = result.pending.iter().map(|a| a.title.as_str()).collect();
        let completed: Vec<_> = result.completed.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(pending, ["A", "C", "E"]);
        assert_eq!(completed, ["B", "D (submitted)"]);
    }

    #[test]
    fn course_is_cleaned_and_annotated() {
        let input = vec![raw(
            "Lab",
            "2025-26_Web Development-1_CA102B_I_B_ANK",
            Some("Mr. Ankit Verma"),
            "12 Jan 2030",
        )];
        let result = partition(input, now());

        assert_eq!(result.pending[0].course, "Web Development-1 (Mr. Ankit Verma)");
        assert_eq!(result.pending[0].date, "12 Jan 2030");
    }

    #[test]
    fn new_client_starts_unauthenticated() {
        let client = MoodleClient::new(Credentials::new("user", "pass")).unwrap();
        assert_eq!(client.state(), ClientState::Unauthenticated);
    }
}
