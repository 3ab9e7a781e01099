//! Entry point for the student directory's request layer.
//!
//! The directory stores each student's Moodle login next to their record.
//! This module looks those credentials up by roll number and runs a fresh
//! [`MoodleClient`] for the request.

use crate::client::MoodleClient;
use crate::config::MoodleConfig;
use crate::error::{AuthError, ScraperError};
use crate::models::{AssignmentsResult, Credentials};
use async_trait::async_trait;
use thiserror::Error;

/// Where student Moodle credentials are kept.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Credentials on record for `roll_number`, if both fields are set.
    async fn moodle_credentials(&self, roll_number: &str) -> Option<Credentials>;
}

#[derive(Error, Debug)]
pub enum AssignmentsError {
    #[error("Moodle credentials not set for student {0}")]
    MissingCredentials(String),

    #[error(transparent)]
    Unauthorized(AuthError),

    #[error("Failed to fetch Moodle assignments: {0}")]
    Failed(ScraperError),
}

impl AssignmentsError {
    /// HTTP status the route answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            AssignmentsError::MissingCredentials(_) => 400,
            AssignmentsError::Unauthorized(_) => 401,
            AssignmentsError::Failed(_) => 500,
        }
    }
}

impl From<ScraperError> for AssignmentsError {
    fn from(err: ScraperError) -> Self {
        match err {
            ScraperError::Auth(AuthError::Network(e)) => {
                AssignmentsError::Failed(ScraperError::NetworkFailure(e))
            }
            ScraperError::Auth(auth) => AssignmentsError::Unauthorized(auth),
            other => AssignmentsError::Failed(other),
        }
    }
}

/// Fetches the assignments of the student with `roll_number`.
pub async fn fetch_student_assignments<S>(
    store: &S,
    roll_number: &str,
    config: MoodleConfig,
) -> Result<AssignmentsResult, AssignmentsError>
where
    S: CredentialStore + ?Sized,
{
    let credentials = store
        .moodle_credentials(roll_number)
        .await
        .filter(|c| !c.username.is_empty() && !c.password.is_empty())
        .ok_or_else(|| AssignmentsError::MissingCredentials(roll_number.to_string()))?;

    let mut client = MoodleClient::with_config(credentials, config)?;
    Ok(client.get_assignments().await?)
}
