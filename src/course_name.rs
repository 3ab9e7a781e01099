//! String heuristics for Moodle course labels.
//!
//! Moodle shortnames look like `2025-26_Web Development-1_CA102B_I_B_ANK`:
//! an academic-year prefix, the human name, then administrative codes.
//! Nothing here touches HTML or the network.

use crate::models::PLACEHOLDER_COURSE;
use regex::Regex;
use std::sync::LazyLock;

static RE_YEAR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}[_ ]*").expect("invalid regex: year prefix"));

const YEAR_RANGE: &str = "2025-26";
const COURSE_NAME_LABEL: &str = "Course name";

/// Longest title prefix still treated as a course code (exclusive).
const COURSE_CODE_PREFIX_MAX: usize = 15;

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

/// Segments like `CA102B` mark the start of administrative metadata.
fn is_course_code(segment: &str) -> bool {
    has_digit(segment) && segment.chars().count() > 4
}

/// Turns a raw course label into a readable name.
///
/// `"2025-26_Web Development-1_CA102B_I_B_ANK"` becomes `"Web Development-1"`.
/// Empty input and the placeholder course are returned unchanged.
pub fn clean(raw: &str) -> String {
    if raw.is_empty() || raw == PLACEHOLDER_COURSE {
        return raw.to_string();
    }

    // Moodle 4 prefixes the name with a screen-reader "Course name" label.
    let unlabelled = raw.replace(COURSE_NAME_LABEL, "");
    let mut name = RE_YEAR_PREFIX.replace(unlabelled.trim(), "").into_owned();

    if name.contains('_') {
        // The leading segment is the name itself; codes only follow it.
        let mut parts = name.split('_');
        let mut kept: Vec<&str> = parts.next().into_iter().collect();
        kept.extend(parts.take_while(|p| !is_course_code(p)));

        let joined = kept.join(" ").trim().to_string();
        if joined.chars().count() > 2 {
            name = joined;
        }
    }

    name.replace(YEAR_RANGE, "").trim().to_string()
}

/// Splits a `"CODE101: Title"` style title into a course code and the rest.
///
/// The prefix qualifies when it is short and contains a digit; otherwise the
/// title is not split and `None` is returned.
pub fn split_course_prefix(title: &str) -> Option<(String, String)> {
    let (prefix, rest) = title.split_once(':')?;
    let prefix = prefix.trim();
    if prefix.chars().count() < COURSE_CODE_PREFIX_MAX && has_digit(prefix) {
        Some((prefix.to_string(), rest.trim().to_string()))
    } else {
        None
    }
}

/// Course label as shown to students: `"<course> (<teacher>)"` when the
/// teacher is known.
pub fn display(course: &str, teacher: Option<&str>) -> String {
    match teacher {
        Some(t) => format!("{} ({})", course, t),
        None => course.to_string(),
    }
}
