use crate::{
    api,
    api::handlers::{
        auth::{AuthConfig, AuthState, SessionSigner},
        chat::ChatTokenExchanger,
    },
    mail::LogEmailSender,
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_origin: Option<String>,
    pub session_secret: SecretString,
    pub mail_from: String,
    pub directline_secret: Option<SecretString>,
    pub directline_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the Direct Line HTTP client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = AuthConfig::new();
    let signer = SessionSigner::new(&args.session_secret, config.session_ttl_seconds());

    // No SMTP transport is wired up yet.
    let mailer = Arc::new(LogEmailSender);
    warn!("No mail transport configured, verification codes are logged, not delivered");

    let auth_state = Arc::new(AuthState::new(config, signer, mailer, args.mail_from));

    let chat_exchanger = Arc::new(ChatTokenExchanger::new(
        args.directline_url,
        args.directline_secret,
    )?);

    if !chat_exchanger.is_configured() {
        warn!("Direct Line secret not configured, chat token requests will answer 500");
    }

    api::new(
        args.port,
        args.dsn,
        args.frontend_origin,
        auth_state,
        chat_exchanger,
    )
    .await
}
