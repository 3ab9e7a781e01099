use crate::error::AuthError;
use crate::models::Credentials;
use crate::session::Session;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{info, instrument, warn};

const TOKEN_FIELD: &str = "logintoken";
const LOGGED_IN_MARKER: &str = "Log out";
const DASHBOARD_TITLE: &str = "Dashboard";

static TOKEN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("input[name=\"{}\"]", TOKEN_FIELD)).expect("invalid selector: token")
});
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("invalid selector: title"));

/// Extracts the hidden anti-forgery token from the login form.
pub fn find_login_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TOKEN_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("value"))
        .map(str::to_string)
}

pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
}

/// A page counts as logged in when it offers a logout link or is titled
/// as the dashboard.
pub fn is_logged_in(html: &str) -> bool {
    html.contains(LOGGED_IN_MARKER)
        || page_title(html).is_some_and(|title| title.contains(DASHBOARD_TITLE))
}

/// Logs `session` into Moodle. On success the session's cookie store carries
/// the Moodle session cookie for every later request.
#[instrument(skip_all, fields(username = %credentials.username))]
pub async fn authenticate(
    session: &mut Session,
    credentials: &Credentials,
) -> Result<(), AuthError> {
    let login_page = session.get_login_page().await.map_err(AuthError::Network)?;

    let token = find_login_token(&login_page).ok_or_else(|| {
        warn!("login form has no {} field", TOKEN_FIELD);
        AuthError::StructureChanged(format!("login form has no {} field", TOKEN_FIELD))
    })?;

    let form = [
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
        (TOKEN_FIELD, token.as_str()),
    ];
    let response = session.post_login(&form).await.map_err(AuthError::Network)?;

    if !is_logged_in(&response) {
        let title = page_title(&response);
        warn!(
            title = title.as_deref().unwrap_or("No Title"),
            "Moodle rejected the login"
        );
        return Err(AuthError::InvalidCredentials);
    }

    session.mark_authenticated();
    info!("logged into Moodle");
    Ok(())
}
