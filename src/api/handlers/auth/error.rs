//! Error surface of the auth endpoints.
//!
//! Signup, login and resend answer with a stable machine-readable `code`
//! string so clients can branch without parsing prose. The OTP verification
//! endpoint predates that scheme and answers with a human-readable `error`
//! message instead. Both shapes share the `{"ok": false}` envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Wire body for every failed auth request.
#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorBody {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Name is required")]
    RequiredName,

    #[error("Email is required")]
    RequiredEmail,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Invalid input")]
    InvalidInput,

    #[error("Email already registered")]
    EmailInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid OTP")]
    OtpInvalid,

    #[error("OTP not found")]
    OtpNotFound,

    #[error("OTP already used")]
    OtpAlreadyUsed,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Verification failed")]
    VerifyFailed(#[source] anyhow::Error),

    #[error("Signup failed")]
    SignupFailed(#[source] anyhow::Error),

    #[error("Login failed")]
    LoginFailed(#[source] anyhow::Error),

    #[error("Resend failed")]
    ResendFailed(#[source] anyhow::Error),
}

impl AuthError {
    /// Stable error code, `None` for the message-shaped OTP responses.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::RequiredName => Some("REQUIRED_NAME"),
            Self::RequiredEmail => Some("REQUIRED_EMAIL"),
            Self::PasswordTooShort => Some("PASSWORD_TOO_SHORT"),
            Self::InvalidInput => Some("INVALID_INPUT"),
            Self::EmailInUse => Some("EMAIL_IN_USE"),
            Self::InvalidCredentials => Some("INVALID_CREDENTIALS"),
            Self::EmailNotVerified => Some("EMAIL_NOT_VERIFIED"),
            Self::SignupFailed(_) => Some("SIGNUP_FAILED"),
            Self::LoginFailed(_) => Some("LOGIN_FAILED"),
            Self::ResendFailed(_) => Some("RESEND_FAILED"),
            Self::InvalidEmail
            | Self::OtpInvalid
            | Self::OtpNotFound
            | Self::OtpAlreadyUsed
            | Self::OtpExpired
            | Self::VerifyFailed(_) => None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::SignupFailed(_)
            | Self::LoginFailed(_)
            | Self::ResendFailed(_)
            | Self::VerifyFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            Self::SignupFailed(err) => error!("Signup failed: {err:#}"),
            Self::LoginFailed(err) => error!("Login failed: {err:#}"),
            Self::ResendFailed(err) => error!("Resend failed: {err:#}"),
            Self::VerifyFailed(err) => error!("Verification failed: {err:#}"),
            _ => {}
        }

        let body = match self.code() {
            Some(code) => ErrorBody {
                ok: false,
                code: Some(code.to_string()),
                error: None,
            },
            None => ErrorBody {
                ok: false,
                code: None,
                error: Some(self.to_string()),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(error: AuthError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn validation_errors_carry_stable_codes() {
        assert_eq!(AuthError::RequiredName.code(), Some("REQUIRED_NAME"));
        assert_eq!(AuthError::RequiredEmail.code(), Some("REQUIRED_EMAIL"));
        assert_eq!(
            AuthError::PasswordTooShort.code(),
            Some("PASSWORD_TOO_SHORT")
        );
        assert_eq!(AuthError::InvalidInput.code(), Some("INVALID_INPUT"));
        assert_eq!(AuthError::EmailInUse.code(), Some("EMAIL_IN_USE"));
        assert_eq!(
            AuthError::InvalidCredentials.code(),
            Some("INVALID_CREDENTIALS")
        );
        assert_eq!(
            AuthError::EmailNotVerified.code(),
            Some("EMAIL_NOT_VERIFIED")
        );
    }

    #[test]
    fn otp_errors_have_no_code() {
        assert_eq!(AuthError::OtpNotFound.code(), None);
        assert_eq!(AuthError::OtpAlreadyUsed.code(), None);
        assert_eq!(AuthError::OtpExpired.code(), None);
        assert_eq!(AuthError::OtpInvalid.code(), None);
        assert_eq!(AuthError::InvalidEmail.code(), None);
    }

    #[tokio::test]
    async fn code_shaped_response_is_bad_request() {
        let (status, body) = body_json(AuthError::EmailInUse).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["code"], "EMAIL_IN_USE");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn otp_response_uses_error_message_shape() {
        let (status, body) = body_json(AuthError::OtpAlreadyUsed).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "OTP already used");
        assert!(body.get("code").is_none());
    }

    #[tokio::test]
    async fn storage_failures_map_to_internal_error_codes() {
        let (status, body) = body_json(AuthError::SignupFailed(anyhow!("pool exhausted"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["ok"], false);
        assert_eq!(body["code"], "SIGNUP_FAILED");
    }

    #[tokio::test]
    async fn verification_failure_keeps_message_shape() {
        let (status, body) = body_json(AuthError::VerifyFailed(anyhow!("tx aborted"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Verification failed");
    }
}
