//! Connection settings for the Moodle portal.
//!
//! Defaults point at the KIET Moodle instance. Override via environment
//! variables or explicit construction for staging and tests.

use crate::error::{Result, ScraperError};

pub const LOGIN_PATH: &str = "/login/index.php";
pub const DASHBOARD_PATH: &str = "/my/";
pub const CALENDAR_UPCOMING_PATH: &str = "/calendar/view.php?view=upcoming";

const DEFAULT_BASE_URL: &str = "http://lms.kiet.edu/moodle";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.0.0 Safari/537.36";

/// How transient transport failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Only connect errors and timeouts count.
    pub max_retries: u32,
    /// Lower bound of the randomized pause before a retry.
    pub min_backoff_ms: u64,
    /// Upper bound of the randomized pause before a retry.
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    /// One retry after 200ms - 600ms.
    fn default() -> Self {
        Self {
            max_retries: 1,
            min_backoff_ms: 200,
            max_backoff_ms: 600,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoodleConfig {
    /// Moodle root, without a trailing slash (e.g. `http://lms.kiet.edu/moodle`).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl Default for MoodleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl MoodleConfig {
    /// Config for a Moodle rooted at `base_url`, other settings default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `MOODLE_BASE_URL` (default: `http://lms.kiet.edu/moodle`)
    /// - `MOODLE_TIMEOUT_SECS` (default: 30)
    /// - `MOODLE_MAX_RETRIES` (default: 1)
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("MOODLE_BASE_URL") {
            Ok(url) => Self::with_base_url(url),
            Err(_) => Self::default(),
        };

        if let Some(secs) = env_number("MOODLE_TIMEOUT_SECS")? {
            config.timeout_secs = secs;
        }
        if let Some(retries) = env_number("MOODLE_MAX_RETRIES")? {
            config.retry.max_retries = u32::try_from(retries).map_err(|_| {
                ScraperError::Config(format!("MOODLE_MAX_RETRIES out of range: {}", retries))
            })?;
        }

        Ok(config)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn env_number(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ScraperError::Config(format!("{} must be a number, got {:?}", key, raw))),
        Err(_) => Ok(None),
    }
}
