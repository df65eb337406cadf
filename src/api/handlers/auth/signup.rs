//! Signup endpoint: create the account and send the first verification code.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use crate::mail::verification_message;

use super::error::{AuthError, ErrorBody};
use super::state::AuthState;
use super::storage::{NewUser, SignupOutcome, email_taken, insert_user_and_code};
use super::types::{CreatedUser, SignupRequest, SignupResponse};
use super::utils::{MIN_PASSWORD_LENGTH, hash_password, normalize_email, valid_email};

/// Create a pending account and email it a verification code.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, verification pending", body = SignupResponse),
        (status = 400, description = "Validation failed or email taken", body = ErrorBody),
        (status = 500, description = "Signup failed", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn signup(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => return AuthError::InvalidInput.into_response(),
    };

    // One stable code for the first failing field, in declaration order.
    let name = request.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return AuthError::RequiredName.into_response();
    }

    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    if !valid_email(&email) {
        return AuthError::RequiredEmail.into_response();
    }

    let password = request.password.as_deref().unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return AuthError::PasswordTooShort.into_response();
    }

    let phone = request
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty());

    // Fast-path duplicate check; the unique index on users.email decides
    // races at insert time.
    match email_taken(&pool, &email).await {
        Ok(true) => return AuthError::EmailInUse.into_response(),
        Ok(false) => {}
        Err(err) => return AuthError::SignupFailed(err).into_response(),
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(err) => return AuthError::SignupFailed(err).into_response(),
    };

    let user = NewUser {
        name,
        email: &email,
        phone,
        password_hash: &password_hash,
    };
    let (user_id, code) = match insert_user_and_code(&pool, &user, auth_state.config()).await {
        Ok(SignupOutcome::Created { user_id, code }) => (user_id, code),
        Ok(SignupOutcome::Conflict) => return AuthError::EmailInUse.into_response(),
        Err(err) => return AuthError::SignupFailed(err).into_response(),
    };

    // The account exists either way; a failed send only costs the user a
    // resend request.
    let message = verification_message(
        &email,
        auth_state.mail_from(),
        &code,
        auth_state.config().otp_ttl_seconds(),
    );
    if let Err(err) = auth_state.mailer().send(&message) {
        warn!(email = %email, "Failed to send verification code: {err:#}");
    }

    (
        StatusCode::CREATED,
        Json(SignupResponse {
            ok: true,
            user: CreatedUser {
                id: user_id.to_string(),
                email,
            },
            message: "Check your email to verify your account.".to_string(),
        }),
    )
        .into_response()
}
