//! Shared state and tunables for the auth endpoints.

use std::sync::Arc;

use crate::mail::EmailSender;

use super::session::SessionSigner;

const DEFAULT_OTP_TTL_SECONDS: i64 = 10 * 60;
const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Tunable knobs for signup, verification and login.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    otp_ttl_seconds: i64,
    session_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            otp_ttl_seconds: DEFAULT_OTP_TTL_SECONDS,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_otp_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.otp_ttl_seconds = ttl_seconds;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.session_ttl_seconds = ttl_seconds;
        self
    }

    #[must_use]
    pub(crate) const fn otp_ttl_seconds(&self) -> i64 {
        self.otp_ttl_seconds
    }

    #[must_use]
    pub const fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the auth handlers need beyond the database pool.
pub struct AuthState {
    config: AuthConfig,
    signer: SessionSigner,
    mailer: Arc<dyn EmailSender>,
    mail_from: String,
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        signer: SessionSigner,
        mailer: Arc<dyn EmailSender>,
        mail_from: String,
    ) -> Self {
        Self {
            config,
            signer,
            mailer,
            mail_from,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) const fn signer(&self) -> &SessionSigner {
        &self.signer
    }

    pub(super) fn mailer(&self) -> &dyn EmailSender {
        self.mailer.as_ref()
    }

    pub(super) fn mail_from(&self) -> &str {
        &self.mail_from
    }
}
