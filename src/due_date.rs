//! Pending/Done classification from Moodle's free-text due dates.
//!
//! Moodle prints dates like `Tuesday, 12 January, 11:59 PM` or
//! `Time: Friday, 14 March 2025, 23:59`. The parser is permissive: it skips
//! words it does not know, reads numeric dates day-first, and fills any
//! missing component from `now`.
//!
//! A date without a year is placed in the current year. A January deadline
//! scraped in December therefore lands in the past and is reported as Done.
//! This is a known limitation of the heuristic and is kept on purpose.

use crate::models::AssignmentStatus;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static RE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})(?::(\d{2}))?\s*(a\.?m\.?|p\.?m\.?)?")
        .expect("invalid regex: time")
});
static RE_ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("invalid regex: iso date")
});
static RE_NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{2,4})\b").expect("invalid regex: numeric date")
});
static RE_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?$").expect("invalid regex: day"));

const TIME_LABEL: &str = "Time:";
const COMPLETION_WORDS: [&str; 2] = ["submitted", "graded"];

/// The due-date text could not be read as a date. Always recovered from:
/// the assignment is treated as pending.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not parse date {text:?}: {reason}")]
pub struct DateParseFailure {
    pub text: String,
    pub reason: &'static str,
}

/// Outcome of classifying one assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: AssignmentStatus,
    /// Set when the date was unreadable and the status fell back to pending.
    pub parse_failure: Option<DateParseFailure>,
}

/// Date components found in the text so far.
#[derive(Debug, Default)]
struct Parts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    time: Option<NaiveTime>,
    day_offset: Option<i64>,
}

impl Parts {
    fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.time.is_none()
            && self.day_offset.is_none()
    }
}

fn month_from_word(word: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august",
        "september", "october", "november", "december",
    ];
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(word))
        .map(|i| i as u32 + 1)
}

fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    Some(if raw.len() <= 2 { 2000 + year } else { year })
}

fn parse_time(caps: &regex::Captures<'_>) -> Option<NaiveTime> {
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    let second: u32 = caps.get(3).and_then(|s| s.as_str().parse().ok()).unwrap_or(0);

    if let Some(meridiem) = caps.get(4) {
        let pm = meridiem.as_str().to_ascii_lowercase().starts_with('p');
        if hour == 0 || hour > 12 {
            return None;
        }
        hour = match (pm, hour) {
            (false, 12) => 0,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, h) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Reads a due date out of free text, day-first, filling gaps from `now`.
pub fn parse_due_date(
    text: &str,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, DateParseFailure> {
    let fail = |reason: &'static str| DateParseFailure {
        text: text.to_string(),
        reason,
    };
    let mut parts = Parts::default();
    let mut rest = text.to_string();

    let time_match = RE_TIME
        .captures(&rest)
        .and_then(|caps| Some((parse_time(&caps), caps.get(0)?.range())));
    if let Some((time, span)) = time_match {
        parts.time = Some(time.ok_or_else(|| fail("time out of range"))?);
        rest.replace_range(span, " ");
    }

    if let Some(caps) = RE_ISO_DATE.captures(&rest) {
        parts.year = caps[1].parse().ok();
        parts.month = caps[2].parse().ok();
        parts.day = caps[3].parse().ok();
    } else if let Some(caps) = RE_NUMERIC_DATE.captures(&rest) {
        let first: Option<u32> = caps[1].parse().ok();
        let second: Option<u32> = caps[2].parse().ok();
        // Day-first, unless the second field cannot be a month.
        (parts.day, parts.month) = match (first, second) {
            (Some(f), Some(s)) if s > 12 && f <= 12 => (Some(s), Some(f)),
            _ => (first, second),
        };
        parts.year = expand_year(&caps[3]);
    } else {
        for word in rest
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            match word.as_str() {
                "today" => parts.day_offset = Some(0),
                "tomorrow" => parts.day_offset = Some(1),
                "yesterday" => parts.day_offset = Some(-1),
                _ => {}
            }
            if let Some(caps) = RE_DAY.captures(&word) {
                if parts.day.is_none() {
                    parts.day = caps[1].parse::<u32>().ok().filter(|d| (1..=31).contains(d));
                }
            } else if word.len() == 4 && word.chars().all(|c| c.is_ascii_digit()) {
                parts.year = parts.year.or_else(|| word.parse().ok());
            } else if parts.month.is_none() {
                parts.month = month_from_word(&word);
            }
        }
    }

    if parts.is_empty() {
        return Err(fail("no date or time found"));
    }

    let base = match parts.day_offset {
        Some(offset) if offset >= 0 => now.date().checked_add_days(Days::new(offset as u64)),
        Some(offset) => now.date().checked_sub_days(Days::new(offset.unsigned_abs())),
        None => Some(now.date()),
    }
    .ok_or_else(|| fail("date out of range"))?;

    let date = NaiveDate::from_ymd_opt(
        parts.year.unwrap_or(base.year()),
        parts.month.unwrap_or(base.month()),
        parts.day.unwrap_or(base.day()),
    )
    .ok_or_else(|| fail("date out of range"))?;

    Ok(date.and_time(parts.time.unwrap_or(NaiveTime::MIN)))
}

/// Decides whether an assignment is still pending.
///
/// A due date strictly before `now` means Done. A future date is still Done
/// when the title says the work was submitted or graded. An unreadable date
/// is Pending, with the failure reported in the result.
pub fn classify(date_text: &str, title: &str, now: NaiveDateTime) -> Classification {
    let cleaned = date_text
        .trim()
        .strip_prefix(TIME_LABEL)
        .unwrap_or(date_text)
        .trim();

    let due = match parse_due_date(cleaned, now) {
        Ok(due) => due,
        Err(failure) => {
            return Classification {
                status: AssignmentStatus::Pending,
                parse_failure: Some(failure),
            };
        }
    };

    let title = title.to_lowercase();
    let status = if due < now || COMPLETION_WORDS.iter().any(|w| title.contains(w)) {
        AssignmentStatus::Done
    } else {
        AssignmentStatus::Pending
    };

    Classification {
        status,
        parse_failure: None,
    }
}
