pub mod calendar;
pub mod chain;
pub mod course_map;
pub mod timeline;

use crate::course_name;
use crate::models::{DETAILED_VIEW_DATE, PLACEHOLDER_COURSE, RawAssignmentEvent, UNKNOWN_DATE};

/// Scraped date text this long almost certainly captured an unrelated block.
const DATE_TEXT_MAX: usize = 50;

/// Builds an event from the scraped pieces, shared by every source.
///
/// A missing date becomes `"Upcoming"`, an overlong one the detailed-view
/// sentinel. With `promote_prefix`, a `CODE101: Title` prefix replaces the
/// course label.
fn build_event(
    title: String,
    course: Option<String>,
    date_text: Option<String>,
    promote_prefix: bool,
) -> RawAssignmentEvent {
    let mut title = title;
    let mut course = course.unwrap_or_else(|| PLACEHOLDER_COURSE.to_string());

    if promote_prefix {
        if let Some((code, rest)) = course_name::split_course_prefix(&title) {
            course = code;
            title = rest;
        }
    }

    let date_text = match date_text {
        Some(d) if d.chars().count() > DATE_TEXT_MAX => DETAILED_VIEW_DATE.to_string(),
        Some(d) => d,
        None => UNKNOWN_DATE.to_string(),
    };

    RawAssignmentEvent {
        title,
        course,
        teacher: None,
        date_text,
    }
}
