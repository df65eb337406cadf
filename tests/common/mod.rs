use portiko::api;
use portiko::api::handlers::auth::{AuthConfig, AuthState, SessionSigner};
use portiko::api::handlers::chat::{ChatTokenExchanger, DIRECTLINE_TOKEN_URL};
use portiko::mail::LogEmailSender;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};

#[allow(dead_code)]
pub const TEST_SESSION_SECRET: &str = "integration-test-secret";

/// DSN pointing at a port nothing listens on, so handlers that reach the
/// database fail fast and deterministically.
#[allow(dead_code)]
pub const DEAD_DSN: &str = "postgres://postgres@127.0.0.1:1/postgres";

#[allow(dead_code)]
pub fn test_auth_state() -> Arc<AuthState> {
    let config = AuthConfig::new();
    let signer = SessionSigner::new(
        &SecretString::from(TEST_SESSION_SECRET),
        config.session_ttl_seconds(),
    );
    Arc::new(AuthState::new(
        config,
        signer,
        Arc::new(LogEmailSender),
        "no-reply@example.com".to_string(),
    ))
}

/// Build the full application router backed by a pool that cannot connect.
///
/// Validation paths never touch the pool; datastore paths answer 500 once the
/// short acquire timeout hits the closed port.
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(DEAD_DSN)
        .expect("lazy pool");

    // No Direct Line secret configured: the token endpoint answers 500.
    let chat = Arc::new(
        ChatTokenExchanger::new(DIRECTLINE_TOKEN_URL.to_string(), None).expect("http client"),
    );

    api::app(pool, None, test_auth_state(), chat).expect("router")
}
