use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use uuid::Uuid;

use crate::client::{ensure_success, ClientError, ClientResult};

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8501";

pub const SCOPES: &[&str] = &[
    "openid",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/classroom.courses.readonly",
    "https://www.googleapis.com/auth/classroom.rosters.readonly",
    "https://www.googleapis.com/auth/classroom.courseworkmaterials.readonly",
];

#[derive(Clone, Debug)]
pub struct LoginResult {
    pub email: String,
    pub access_token: SecretString,
}

/// Authorization-code login against Google.
#[derive(Clone, Debug)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    pub fn new(client_id: String, client_secret: SecretString, redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            redirect_uri,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    pub fn from_env() -> ClientResult<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| ClientError::Config("GOOGLE_CLIENT_ID is not set".to_string()))?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET")
            .map_err(|_| ClientError::Config("GOOGLE_CLIENT_SECRET is not set".to_string()))?;
        let redirect_uri = std::env::var("GOOGLE_REDIRECT_URI")
            .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());

        Ok(Self::new(client_id, SecretString::from(client_secret), redirect_uri))
    }

    /// Points token exchange and userinfo at other endpoints.
    pub fn with_endpoints(mut self, token_url: &str, userinfo_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self.userinfo_url = userinfo_url.to_string();
        self
    }

    /// Returns the consent page URL and the random `state` it carries.
    pub fn authorization_url(&self) -> ClientResult<(String, String)> {
        let state = Uuid::new_v4().simple().to_string();
        let scope = SCOPES.join(" ");

        let url = Url::parse_with_params(
            GOOGLE_AUTH_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state.as_str()),
                ("access_type", "offline"),
                ("include_granted_scopes", "true"),
            ],
        )
        .map_err(|e| ClientError::OAuth(format!("Failed to build authorization URL: {}", e)))?;

        Ok((url.to_string(), state))
    }

    pub async fn exchange_code(&self, code: &str) -> ClientResult<SecretString> {
        let response = self
            .http
            .post(&self.token_url)
            .header("accept", "application/json")
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let body: Value = response.json().await?;
        access_token_from(&body)
    }

    pub async fn user_email(&self, access_token: &SecretString) -> ClientResult<String> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?;

        let user_info: Value = ensure_success(response).await?.json().await?;
        Ok(user_info
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or("unknown_user")
            .to_string())
    }

    pub async fn login(&self, code: &str) -> ClientResult<LoginResult> {
        let access_token = self.exchange_code(code).await?;
        let email = self.user_email(&access_token).await?;
        log::info!("Logged in as {}", email);

        Ok(LoginResult {
            email,
            access_token,
        })
    }
}

/// Reads `access_token` out of a token endpoint response, surfacing Google's
/// `error` / `error_description` first.
fn access_token_from(body: &Value) -> ClientResult<SecretString> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        let description = body
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        return Err(ClientError::OAuth(format!("{} - {}", error, description)));
    }

    body.get("access_token")
        .and_then(Value::as_str)
        .map(|token| SecretString::from(token.to_string()))
        .ok_or_else(|| ClientError::OAuth("No access_token in token response".to_string()))
}
