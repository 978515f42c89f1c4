//! Client side of EduTutor: the backend API client, the quiz-taking session
//! and the Google login and Classroom integrations used by `edututor-client`.

pub mod api_client;
pub mod classroom;
pub mod google_oauth;
pub mod session;

use thiserror::Error;

pub use api_client::{ApiClient, QuizApi};
pub use classroom::ClassroomClient;
pub use google_oauth::GoogleOAuthClient;
pub use session::{QuizSession, QuizState, SubmissionOutcome};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "user_001";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Turns a non-2xx response into `ClientError::Api`, keeping the body text.
pub(crate) async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read response body".to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}
