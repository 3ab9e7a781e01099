use serde::{Deserialize, Serialize};

/// Course label used when no usable course name could be scraped.
pub const PLACEHOLDER_COURSE: &str = "Moodle Course";

/// Date text used when no date element was found for an event.
pub const UNKNOWN_DATE: &str = "Upcoming";

/// Date text used when the scraped date block was too long to be a date.
pub const DETAILED_VIEW_DATE: &str = "See detailed view";

/// Moodle login for one student. Supplied per request and never persisted here.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// An assignment as it comes off the page, before course cleaning and
/// status classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssignmentEvent {
    /// The assignment title, with any course-code prefix already removed.
    pub title: String,
    /// The course label exactly as scraped (not cleaned).
    pub course: String,
    /// Teacher found in the course map for this course, if any.
    pub teacher: Option<String>,
    /// Free-text due date, or one of the date sentinels.
    pub date_text: String,
}

/// Whether an assignment still needs work.
///
/// Serializes as `"Left"` / `"Done"`, the strings the directory frontend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    #[serde(rename = "Left")]
    Pending,
    Done,
}

/// A classified assignment ready to hand to the route layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub title: String,
    /// Cleaned course name, with the teacher in parentheses when known.
    pub course: String,
    pub status: AssignmentStatus,
    /// Due date as displayed by Moodle, or a sentinel.
    pub date: String,
}

/// All assignments of one student, split by status in scrape order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentsResult {
    pub pending: Vec<Assignment>,
    pub completed: Vec<Assignment>,
}

impl AssignmentsResult {
    pub fn len(&self) -> usize {
        self.pending.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.completed.is_empty()
    }
}

/// One entry of the course map: cleaned course name and its teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseMapEntry {
    pub course: String,
    pub teacher: String,
}

/// Cleaned course name to teacher name, kept in dashboard order.
///
/// Built fresh for every scrape. Lookups scan in insertion order so the
/// first matching course wins, which keeps results deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseMap {
    entries: Vec<CourseMapEntry>,
}

impl CourseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the teacher for `course`, keeping its original position.
    pub fn insert(&mut self, course: String, teacher: String) {
        match self.entries.iter_mut().find(|e| e.course == course) {
            Some(entry) => entry.teacher = teacher,
            None => self.entries.push(CourseMapEntry { course, teacher }),
        }
    }

    pub fn get(&self, course: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.course == course)
            .map(|e| e.teacher.as_str())
    }

    /// Finds the teacher of a cleaned course label by substring match in
    /// either direction. Empty labels and empty keys never match.
    pub fn find_teacher(&self, course: &str) -> Option<&str> {
        if course.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .filter(|e| !e.course.is_empty())
            .find(|e| e.course.contains(course) || course.contains(e.course.as_str()))
            .map(|e| e.teacher.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseMapEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_teacher_matches_both_directions() {
        let mut map = CourseMap::new();
        map.insert("Web Development-1".into(), "Mr. Ankit Verma".into());
        map.insert("Data Structures".into(), "Ms. Rao".into());

        assert_eq!(map.find_teacher("Web Development"), Some("Mr. Ankit Verma"));
        assert_eq!(map.find_teacher("Data Structures Lab"), Some("Ms. Rao"));
        assert_eq!(map.find_teacher("Physics"), None);
        assert_eq!(map.find_teacher(""), None);
    }

    #[test]
    fn empty_key_matches_nothing() {
        let mut map = CourseMap::new();
        map.insert(String::new(), "Mr. Ankit Verma".into());

        assert_eq!(map.find_teacher("Physics"), None);
        assert_eq!(map.find_teacher("Moodle Course"), None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = CourseMap::new();
        map.insert("A".into(), "first".into());
        map.insert("B".into(), "second".into());
        map.insert("A".into(), "third".into());

        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next().map(|e| e.teacher.as_str()), Some("third"));
    }

    #[test]
    fn status_serializes_as_frontend_strings() {
        assert_eq!(
            serde_json::to_string(&AssignmentStatus::Pending).unwrap(),
            "\"Left\""
        );
        assert_eq!(
            serde_json::to_string(&AssignmentStatus::Done).unwrap(),
            "\"Done\""
        );
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("2300290140001", "hunter2");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("2300290140001"));
        assert!(!shown.contains("hunter2"));
    }
}
