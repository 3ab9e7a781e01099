// Declare all our modules
mod assignment_scraper;
mod auth;
mod client;
mod config;
pub mod course_name;
pub mod due_date;
mod error;
mod models;
pub mod parsers;
mod retry;
mod service;
mod session;

// Publicly export the parts of our library that users will need
pub use assignment_scraper::AssignmentScraper;
pub use auth::authenticate;
pub use client::{ClientState, FailureKind, MoodleClient, partition};
pub use config::{MoodleConfig, RetryPolicy};
pub use due_date::{Classification, DateParseFailure};
pub use error::{AuthError, Result, ScraperError};
pub use models::*;
pub use service::{AssignmentsError, CredentialStore, fetch_student_assignments};
pub use session::{Session, SessionState};
