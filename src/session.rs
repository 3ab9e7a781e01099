use crate::config::{LOGIN_PATH, MoodleConfig};
use crate::error::{AuthError, Result, ScraperError};
use crate::retry::retry_send;
use reqwest::cookie::Jar;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// An HTTP context with its own cookie store.
///
/// One session belongs to exactly one client invocation; it is never shared
/// between students, so concurrent requests need no locking.
pub struct Session {
    client: reqwest::Client,
    config: MoodleConfig,
    state: SessionState,
}

impl Session {
    pub fn new(config: MoodleConfig) -> Result<Self> {
        let cookie_jar = Arc::new(Jar::default());

        let client = reqwest::Client::builder()
            .cookie_provider(cookie_jar)
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            state: SessionState::Unauthenticated,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn config(&self) -> &MoodleConfig {
        &self.config
    }

    pub(crate) fn mark_authenticated(&mut self) {
        self.state = SessionState::Authenticated;
    }

    pub(crate) fn mark_unauthenticated(&mut self) {
        self.state = SessionState::Unauthenticated;
    }

    pub(crate) async fn get_login_page(&self) -> std::result::Result<String, reqwest::Error> {
        let url = self.config.url(LOGIN_PATH);
        let response = retry_send(&self.config.retry, || self.client.get(&url).send()).await?;
        response.error_for_status()?.text().await
    }

    pub(crate) async fn post_login(
        &self,
        form: &[(&str, &str)],
    ) -> std::result::Result<String, reqwest::Error> {
        let url = self.config.url(LOGIN_PATH);
        let response =
            retry_send(&self.config.retry, || self.client.post(&url).form(form).send()).await?;
        response.text().await
    }

    /// Fetches a page that requires a logged-in session.
    ///
    /// Fails with `NotAuthenticated` before login, and with
    /// `AuthError::SessionExpired` when Moodle bounces the request back to
    /// the login form.
    pub async fn fetch_page(&self, path: &str) -> Result<String> {
        if !self.is_authenticated() {
            return Err(ScraperError::NotAuthenticated);
        }

        let url = self.config.url(path);
        let response = retry_send(&self.config.retry, || self.client.get(&url).send()).await?;

        if response.url().path().ends_with(LOGIN_PATH) {
            return Err(AuthError::SessionExpired.into());
        }

        Ok(response.error_for_status()?.text().await?)
    }
}
