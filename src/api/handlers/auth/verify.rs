//! Email verification endpoint: check a one-time code and activate the account.

use axum::{Json, extract::Extension, response::IntoResponse};
use sqlx::PgPool;
use tracing::info;

use super::error::{AuthError, ErrorBody};
use super::storage::{CodeCheck, evaluate_code, latest_code_for_email, mark_verified};
use super::types::{OkResponse, VerifyEmailOtpRequest};
use super::utils::{MAX_OTP_LENGTH, MIN_OTP_LENGTH, normalize_email, valid_email};

/// Verify an email against its most recently issued one-time code.
///
/// Failures use the `{"ok": false, "error": ...}` message shape; the message
/// distinguishes unknown, used, expired and mismatched codes.
#[utoipa::path(
    post,
    path = "/auth/verify-email-otp",
    request_body = VerifyEmailOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = OkResponse),
        (status = 400, description = "Unknown, used, expired or mismatched code", body = ErrorBody),
        (status = 500, description = "Verification failed", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn verify_email_otp(
    pool: Extension<PgPool>,
    payload: Option<Json<VerifyEmailOtpRequest>>,
) -> impl IntoResponse {
    let request: VerifyEmailOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return AuthError::InvalidEmail.into_response(),
    };

    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    if !valid_email(&email) {
        return AuthError::InvalidEmail.into_response();
    }

    let otp = request.otp.as_deref().map(str::trim).unwrap_or_default();
    if otp.len() < MIN_OTP_LENGTH || otp.len() > MAX_OTP_LENGTH {
        return AuthError::OtpInvalid.into_response();
    }

    // Only the latest code counts; issuing a new one retires its predecessors.
    let row = match latest_code_for_email(&pool, &email).await {
        Ok(Some(row)) => row,
        Ok(None) => return AuthError::OtpNotFound.into_response(),
        Err(err) => return AuthError::VerifyFailed(err).into_response(),
    };

    match evaluate_code(&row, otp) {
        CodeCheck::AlreadyUsed => AuthError::OtpAlreadyUsed.into_response(),
        CodeCheck::Expired => AuthError::OtpExpired.into_response(),
        CodeCheck::Mismatch => AuthError::OtpInvalid.into_response(),
        CodeCheck::Valid => match mark_verified(&pool, row.code_id, row.user_id).await {
            Ok(()) => {
                info!(user_id = %row.user_id, "Email verified");
                Json(OkResponse { ok: true }).into_response()
            }
            Err(err) => AuthError::VerifyFailed(err).into_response(),
        },
    }
}
