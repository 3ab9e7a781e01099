use moodle_core::{Credentials, MoodleClient, MoodleConfig};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints a student's Moodle assignments as JSON.
///
/// MOODLE_USERNAME="roll" MOODLE_PASSWORD="secret" moodle-assignments
#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "moodle_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (Ok(username), Ok(password)) = (env::var("MOODLE_USERNAME"), env::var("MOODLE_PASSWORD"))
    else {
        eprintln!("MOODLE_USERNAME and MOODLE_PASSWORD must be set");
        return ExitCode::from(2);
    };

    let result = async {
        let config = MoodleConfig::from_env()?;
        let mut client = MoodleClient::with_config(Credentials::new(username, password), config)?;
        client.get_assignments().await
    }
    .await;

    match result {
        Ok(assignments) => match serde_json::to_string_pretty(&assignments) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("could not serialize assignments: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) if e.is_auth_failure() => {
            tracing::error!("{e}");
            ExitCode::from(3)
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
