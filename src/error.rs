use thiserror::Error;

/// Failures of the login phase. These always reach the caller so that a
/// rejected login can be told apart from a scrape that merely found nothing.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication failed. Please check your Moodle credentials.")]
    InvalidCredentials,

    #[error("The Moodle login page changed shape: {0}")]
    StructureChanged(String),

    #[error("The Moodle session appears to have expired")]
    SessionExpired,

    #[error("Could not reach Moodle while logging in: {0}")]
    Network(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Request to Moodle failed: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Session is not authenticated; log in before scraping")]
    NotAuthenticated,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScraperError {
    /// True when Moodle refused the login or the session, as opposed to the
    /// portal being unreachable or the scrape going wrong.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ScraperError::Auth(auth) if !matches!(auth, AuthError::Network(_)))
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
