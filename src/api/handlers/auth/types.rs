//! Wire types for the auth endpoints.
//!
//! Request fields are `Option` so validation can answer with one stable code
//! per missing or malformed field instead of a serde rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Public view of a just-created account.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct CreatedUser {
    pub id: String,
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub ok: bool,
    pub user: CreatedUser,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    /// Email address; named `identifier` for future username support.
    pub identifier: Option<String>,
    pub password: Option<String>,
}

/// Public view of a logged-in account.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub ok: bool,
    pub token: String,
    pub user: UserProfile,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyEmailOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResendVerificationRequest {
    pub email: Option<String>,
}

/// Bare success envelope for verification and resend.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct OkResponse {
    pub ok: bool,
}
