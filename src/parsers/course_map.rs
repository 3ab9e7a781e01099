use super::chain::{SelectorChain, element_text};
use crate::course_name;
use crate::models::CourseMap;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Longest text accepted as a teacher name (exclusive).
const TEACHER_TEXT_MAX: usize = 40;

/// Category headers share the teacher markup in some themes.
const CATEGORY_MARKER: &str = "Category";

static CARD_CHAIN: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&["div.dashboard-card", "div.course-info-container", "div.card-body"])
});
// Moodle 4 labels course names with span.multiline.
static NAME_CHAIN: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["span.multiline", "h6"]));
static TEACHER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.text-muted").expect("invalid selector: teacher"));

fn accept_teacher(text: &str) -> bool {
    !text.is_empty() && text.chars().count() < TEACHER_TEXT_MAX && !text.contains(CATEGORY_MARKER)
}

/// Builds the course-to-teacher map from the dashboard's course overview.
///
/// Keys are cleaned course names. Never fails: markup that matches none of
/// the known layouts gives an empty map.
pub fn extract_course_map(dashboard_html: &str) -> CourseMap {
    let document = Html::parse_document(dashboard_html);
    let mut map = CourseMap::new();

    let Some((_, cards)) = CARD_CHAIN.first_match(document.root_element()) else {
        return map;
    };

    for card in cards {
        let Some(name) = NAME_CHAIN.first_text(card) else {
            continue;
        };
        let Some(teacher) = card.select(&TEACHER_SELECTOR).next().map(element_text) else {
            continue;
        };
        let course = course_name::clean(&name);
        if !course.is_empty() && accept_teacher(&teacher) {
            map.insert(course, teacher);
        }
    }

    map
}
