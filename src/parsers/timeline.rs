use super::build_event;
use super::chain::{SelectorChain, element_text};
use crate::models::RawAssignmentEvent;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

const COURSE_LINK_PATTERN: &str = "course/view.php";

static ITEM_CHAIN: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&[
        "div.event-list-item",
        r#"div[data-region="event-list-item"]"#,
        "li.list-group-item",
    ])
});
static TITLE_CHAIN: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["h6.event-name", "h3", "a"]));
static DATE_CHAIN: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["div.text-muted", "time"]));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector: link"));

/// Course name from the first link into a course page.
fn course_from_links(item: ElementRef<'_>) -> Option<String> {
    item.select(&LINK_SELECTOR)
        .filter(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.contains(COURSE_LINK_PATTERN))
        })
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// Parses the dashboard timeline block into raw events, in page order.
///
/// The course comes from a link to the course page. Items without one fall
/// back to the `CODE101: Title` prefix, then to the placeholder course.
pub fn parse_timeline_events(html: &str) -> (Option<&'static str>, Vec<RawAssignmentEvent>) {
    let document = Html::parse_document(html);

    let Some((strategy, nodes)) = ITEM_CHAIN.first_match(document.root_element()) else {
        return (None, Vec::new());
    };

    let events = nodes
        .into_iter()
        .filter_map(|node| {
            let title = TITLE_CHAIN.first_text(node)?;
            let date = DATE_CHAIN.first_text(node);
            let course = course_from_links(node);
            let promote_prefix = course.is_none();
            Some(build_event(title, course, date, promote_prefix))
        })
        .collect();

    (Some(strategy), events)
}
