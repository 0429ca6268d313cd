//! HTTP client for the backend auth surface.

use serde::Deserialize;
use tracing::instrument;

use skycast_core::error::{ApiError, AppError, AuthError, ReqwestErrorExt};

use crate::session::UserRef;

/// Credential exchange response. The backend has shipped the token under
/// two different field names; tolerate both.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token: Option<String>,
    pub user: Option<UserRef>,
}

impl TokenResponse {
    pub fn into_token(self) -> Option<String> {
        self.access_token.or(self.token)
    }
}

pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Exchange credentials for a token via the password grant.
    #[instrument(skip(self, password), level = "info")]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AppError> {
        let url = format!("{}/api/auth/token", self.base_url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("username", username),
                ("password", password),
                ("grant_type", "password"),
            ])
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        if !response.status().is_success() {
            let detail = extract_field(response, "detail").await;
            return Err(AuthError::LoginFailed(
                detail.unwrap_or_else(|| "Login failed".to_string()),
            )
            .into());
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| e.into_network_error().into())
    }

    /// Create an account. Does not log in.
    #[instrument(skip(self, password), level = "info")]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let url = format!("{}/api/auth/register", self.base_url);

        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        if !response.status().is_success() {
            let detail = extract_field(response, "detail").await;
            return Err(AuthError::RegistrationFailed(
                detail.unwrap_or_else(|| "Registration failed".to_string()),
            )
            .into());
        }

        Ok(())
    }

    /// Liveness probe for a persisted token: hit a protected endpoint and
    /// treat any failure as an invalid session.
    #[instrument(skip(self, token), level = "info")]
    pub async fn check_token(&self, token: &str) -> Result<(), AppError> {
        let url = format!("{}/api/locations", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|_| AuthError::SessionExpired)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AuthError::SessionExpired.into())
        }
    }

    /// Associate a device push token with the authenticated session.
    #[instrument(skip(self, session_token), level = "info")]
    pub async fn register_device(
        &self,
        device_token: &str,
        session_token: &str,
    ) -> Result<(), AppError> {
        let url = format!("{}/auth/register-device", self.base_url);

        let body = serde_json::json!({ "deviceToken": device_token });

        let response = self
            .client
            .post(&url)
            .bearer_auth(session_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = extract_field(response, "message").await;
            Err(ApiError::new(
                status,
                message.unwrap_or_else(|| "Failed to register device".to_string()),
            )
            .into())
        }
    }
}

/// Pull a string field out of an error body, if the backend supplied one.
async fn extract_field(response: reqwest::Response, field: &str) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body.get(field)?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_sends_password_grant_form() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/token"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("username=a%40b.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "abc",
                "user": {"email": "a@b.com"}
            })))
            .mount(&mock_server)
            .await;

        let client = AuthClient::new(&mock_server.uri());
        let response = client.login("a@b.com", "secret").await.unwrap();

        assert_eq!(response.user.as_ref().unwrap().email, "a@b.com");
        assert_eq!(response.into_token().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_login_tolerates_alternate_token_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token": "xyz" })),
            )
            .mount(&mock_server)
            .await;

        let client = AuthClient::new(&mock_server.uri());
        let response = client.login("a@b.com", "secret").await.unwrap();

        assert_eq!(response.into_token().as_deref(), Some("xyz"));
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_backend_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "detail": "Incorrect username or password"
            })))
            .mount(&mock_server)
            .await;

        let client = AuthClient::new(&mock_server.uri());
        let err = client.login("a@b.com", "wrong").await.unwrap_err();

        assert_eq!(err.user_message(), "Incorrect username or password");
    }

    #[tokio::test]
    async fn test_login_failure_without_detail_uses_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = AuthClient::new(&mock_server.uri());
        let err = client.login("a@b.com", "pw").await.unwrap_err();

        assert_eq!(err.user_message(), "Login failed");
    }

    #[tokio::test]
    async fn test_check_token_rejects_expired() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = AuthClient::new(&mock_server.uri());
        let result = client.check_token("expired").await;

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::SessionExpired))
        ));
    }

    #[tokio::test]
    async fn test_register_device_sends_bearer_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/register-device"))
            .and(header("Authorization", "Bearer session_tok"))
            .and(body_string_contains("deviceToken"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = AuthClient::new(&mock_server.uri());
        let result = client.register_device("device_tok", "session_tok").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_register_device_failure_uses_message_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/register-device"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Unknown device"
            })))
            .mount(&mock_server)
            .await;

        let client = AuthClient::new(&mock_server.uri());
        let err = client.register_device("d", "s").await.unwrap_err();

        assert_eq!(err.user_message(), "Unknown device");
    }
}
