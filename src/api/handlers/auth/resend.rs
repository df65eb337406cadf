//! Resend endpoint: issue a fresh verification code for an unverified account.

use axum::{Json, extract::Extension, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::mail::verification_message;

use super::error::{AuthError, ErrorBody};
use super::state::AuthState;
use super::storage::{ResendOutcome, issue_resend_code};
use super::types::{OkResponse, ResendVerificationRequest};
use super::utils::normalize_email;

/// Issue a replacement verification code.
///
/// Unknown and already-verified emails get the same `{"ok": true}` as a real
/// resend, so the endpoint cannot be used to probe for accounts. Presence is
/// the only input check for the same reason.
#[utoipa::path(
    post,
    path = "/auth/resend",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Accepted", body = OkResponse),
        (status = 400, description = "Missing email", body = ErrorBody),
        (status = 500, description = "Resend failed", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn resend_verification(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ResendVerificationRequest>>,
) -> impl IntoResponse {
    let request: ResendVerificationRequest = match payload {
        Some(Json(payload)) => payload,
        None => return AuthError::RequiredEmail.into_response(),
    };

    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    if email.is_empty() {
        return AuthError::RequiredEmail.into_response();
    }

    match issue_resend_code(&pool, &email, auth_state.config()).await {
        Ok(ResendOutcome::Issued { user_id, code }) => {
            let message = verification_message(
                &email,
                auth_state.mail_from(),
                &code,
                auth_state.config().otp_ttl_seconds(),
            );
            if let Err(err) = auth_state.mailer().send(&message) {
                return AuthError::ResendFailed(err).into_response();
            }
            info!(user_id = %user_id, "Reissued verification code");
            Json(OkResponse { ok: true }).into_response()
        }
        Ok(ResendOutcome::Noop) => Json(OkResponse { ok: true }).into_response(),
        Err(err) => AuthError::ResendFailed(err).into_response(),
    }
}
