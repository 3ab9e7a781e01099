use super::build_event;
use super::chain::SelectorChain;
use crate::models::RawAssignmentEvent;
use scraper::Html;
use std::sync::LazyLock;

/// Longest text accepted as a course label (exclusive).
const COURSE_TEXT_MAX: usize = 50;

// Boost theme first, then older and card-based layouts.
static EVENT_CHAIN: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&[
        "div.event",
        "div.calendar_event_item",
        "div.card",
        "li.list-group-item",
    ])
});
static TITLE_CHAIN: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&["h3.name", "a.card-link", "a.event-title", "h3.h5"])
});
static DATE_CHAIN: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["div.date", "div.row", "div.text-muted"]));
static COURSE_CHAIN: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&["div.course", "span.course", "div.col-11", "small"])
});

/// Parses the calendar "upcoming" view into raw events, in page order.
///
/// Returns the matching container strategy alongside the events; `None`
/// means no strategy matched any node.
pub fn parse_upcoming_events(html: &str) -> (Option<&'static str>, Vec<RawAssignmentEvent>) {
    let document = Html::parse_document(html);

    let Some((strategy, nodes)) = EVENT_CHAIN.first_match(document.root_element()) else {
        return (None, Vec::new());
    };

    let events = nodes
        .into_iter()
        .filter_map(|node| {
            let title = TITLE_CHAIN.first_text(node)?;
            let date = DATE_CHAIN.first_text(node);
            let course = COURSE_CHAIN
                .first_text(node)
                .filter(|c| c.chars().count() < COURSE_TEXT_MAX);
            Some(build_event(title, course, date, true))
        })
        .collect();

    (Some(strategy), events)
}
