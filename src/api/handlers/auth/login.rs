//! Login endpoint: exchange email + password for a session token.

use axum::{Json, extract::Extension, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;

use super::error::{AuthError, ErrorBody};
use super::state::AuthState;
use super::storage::lookup_login_record;
use super::types::{LoginRequest, LoginResponse, UserProfile};
use super::utils::{MIN_PASSWORD_LENGTH, normalize_email, verify_password};

/// Authenticate a verified account and issue a session token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Validation, credential or verification failure", body = ErrorBody),
        (status = 500, description = "Login failed", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return AuthError::InvalidInput.into_response(),
    };

    let identifier = request
        .identifier
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if identifier.is_empty() {
        return AuthError::RequiredEmail.into_response();
    }

    let password = request.password.as_deref().unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return AuthError::PasswordTooShort.into_response();
    }

    let email = normalize_email(identifier);
    let record = match lookup_login_record(&pool, &email).await {
        Ok(record) => record,
        Err(err) => return AuthError::LoginFailed(err).into_response(),
    };

    // Unknown account and wrong password answer identically.
    let Some(record) = record else {
        return AuthError::InvalidCredentials.into_response();
    };

    if !verify_password(password, &record.password_hash) {
        return AuthError::InvalidCredentials.into_response();
    }

    // The verification gate sits behind the password check; this answer is
    // only reachable with valid credentials.
    if !record.verified {
        return AuthError::EmailNotVerified.into_response();
    }

    let token = match auth_state
        .signer()
        .issue(record.user_id, &record.email, &record.name)
    {
        Ok(token) => token,
        Err(err) => return AuthError::LoginFailed(err).into_response(),
    };

    Json(LoginResponse {
        ok: true,
        token,
        user: UserProfile {
            id: record.user_id.to_string(),
            name: record.name,
            email: record.email,
        },
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::super::session::SessionSigner;
    use super::super::state::{AuthConfig, AuthState};
    use super::{LoginRequest, login};
    use crate::mail::LogEmailSender;
    use anyhow::Result;
    use axum::Json;
    use axum::body::to_bytes;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use secrecy::SecretString;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    fn auth_state() -> Arc<AuthState> {
        let config = AuthConfig::new();
        let signer = SessionSigner::new(
            &SecretString::from("test-session-secret"),
            config.session_ttl_seconds(),
        );
        Arc::new(AuthState::new(
            config,
            signer,
            Arc::new(LogEmailSender),
            "no-reply@example.com".to_string(),
        ))
    }

    async fn error_code(response: Response) -> Result<String> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(body["code"].as_str().unwrap_or_default().to_string())
    }

    #[tokio::test]
    async fn login_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = login(Extension(pool), Extension(auth_state()), None)
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await?, "INVALID_INPUT");
        Ok(())
    }

    #[tokio::test]
    async fn login_missing_identifier() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = login(
            Extension(pool),
            Extension(auth_state()),
            Some(Json(LoginRequest {
                identifier: Some("  ".to_string()),
                password: Some("longenoughpassword".to_string()),
            })),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await?, "REQUIRED_EMAIL");
        Ok(())
    }

    #[tokio::test]
    async fn login_short_password() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = login(
            Extension(pool),
            Extension(auth_state()),
            Some(Json(LoginRequest {
                identifier: Some("ada@example.com".to_string()),
                password: Some("short".to_string()),
            })),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await?, "PASSWORD_TOO_SHORT");
        Ok(())
    }
}
