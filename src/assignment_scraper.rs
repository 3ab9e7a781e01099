use crate::config::{CALENDAR_UPCOMING_PATH, DASHBOARD_PATH};
use crate::course_name;
use crate::error::{Result, ScraperError};
use crate::models::{CourseMap, RawAssignmentEvent};
use crate::parsers;
use crate::session::Session;
use tracing::{debug, info, instrument, warn};

/// Fetches assignment pages through an authenticated session.
///
/// The calendar "upcoming" view is the primary source. When it yields no
/// events, the dashboard timeline is parsed instead.
pub struct AssignmentScraper<'a> {
    session: &'a Session,
}

impl<'a> AssignmentScraper<'a> {
    /// Fails with `NotAuthenticated` unless the session has logged in.
    pub fn new(session: &'a Session) -> Result<Self> {
        if !session.is_authenticated() {
            return Err(ScraperError::NotAuthenticated);
        }
        Ok(Self { session })
    }

    pub async fn fetch_dashboard(&self) -> Result<String> {
        self.session.fetch_page(DASHBOARD_PATH).await
    }

    /// Raw events in page order, with teachers filled in from `course_map`.
    ///
    /// `dashboard_html` is the already-fetched dashboard, reused as the
    /// timeline fallback source.
    #[instrument(skip_all)]
    pub async fn scrape_raw(
        &self,
        dashboard_html: &str,
        course_map: &CourseMap,
    ) -> Result<Vec<RawAssignmentEvent>> {
        let calendar_html = self.session.fetch_page(CALENDAR_UPCOMING_PATH).await?;
        let (strategy, mut events) = parsers::calendar::parse_upcoming_events(&calendar_html);
        debug!(strategy, events = events.len(), "parsed calendar");

        if events.is_empty() {
            info!("Calendar returned no assignments, checking dashboard timeline");
            let (strategy, timeline) = parsers::timeline::parse_timeline_events(dashboard_html);
            debug!(strategy, events = timeline.len(), "parsed timeline");
            if strategy.is_none() {
                warn!("no known calendar or timeline layout matched; Moodle markup may have changed");
            }
            events = timeline;
        }

        enrich(&mut events, course_map);
        Ok(events)
    }
}

/// Fills in each event's teacher by matching its cleaned course label
/// against the course map.
pub fn enrich(events: &mut [RawAssignmentEvent], course_map: &CourseMap) {
    for event in events.iter_mut() {
        let cleaned = course_name::clean(&event.course);
        event.teacher = course_map.find_teacher(&cleaned).map(str::to_string);
    }
}
