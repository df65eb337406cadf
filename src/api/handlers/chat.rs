//! Server-side Direct Line token exchange for the hosted chat widget.

use anyhow::{Context, Result};
use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode, header::CACHE_CONTROL},
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, error, info_span};
use utoipa::ToSchema;

/// Hosted Direct Line token endpoint.
pub const DIRECTLINE_TOKEN_URL: &str =
    "https://directline.botframework.com/v3/directline/tokens/generate";

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ChatToken {
    token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ChatTokenError {
    error: String,
}

/// Upstream token payload; extra fields (conversation id, expiry) are ignored.
#[derive(Deserialize)]
struct TokenPayload {
    token: String,
}

#[derive(Debug)]
enum ExchangeError {
    /// Server started without a Direct Line secret.
    NotConfigured,
    /// Upstream answered with a non-success status.
    Upstream(StatusCode),
    /// Request never completed.
    Transport(reqwest::Error),
}

/// Exchanges the server-held Direct Line secret for short-lived chat tokens.
///
/// The long-lived secret never leaves this process and never appears in a
/// response; browsers only see the per-conversation tokens minted upstream.
pub struct ChatTokenExchanger {
    client: Client,
    token_url: String,
    secret: Option<SecretString>,
}

impl ChatTokenExchanger {
    pub fn new(token_url: String, secret: Option<SecretString>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(EXCHANGE_TIMEOUT)
            .build()
            .context("Failed to build Direct Line HTTP client")?;

        Ok(Self {
            client,
            token_url,
            secret,
        })
    }

    /// Whether a secret was configured at startup.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    async fn exchange(&self) -> Result<String, ExchangeError> {
        let Some(secret) = &self.secret else {
            return Err(ExchangeError::NotConfigured);
        };

        let span = info_span!(
            "directline.token.exchange",
            http.method = "POST",
            url = %self.token_url
        );
        async {
            let response = self
                .client
                .post(&self.token_url)
                .bearer_auth(secret.expose_secret())
                .send()
                .await
                .map_err(ExchangeError::Transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(ExchangeError::Upstream(status));
            }

            let payload: TokenPayload = response.json().await.map_err(ExchangeError::Transport)?;
            Ok(payload.token)
        }
        .instrument(span)
        .await
    }
}

type ChatTokenResponse =
    Result<(StatusCode, HeaderMap, Json<ChatToken>), (StatusCode, Json<ChatTokenError>)>;

/// Mint a short-lived Direct Line token for the web chat widget.
#[utoipa::path(
    post,
    path = "/directline/token",
    responses(
        (status = 200, description = "Short-lived Direct Line token", body = ChatToken),
        (status = 500, description = "Secret missing or upstream exchange failed", body = ChatTokenError)
    ),
    tag = "chat"
)]
pub async fn token(exchanger: Extension<Arc<ChatTokenExchanger>>) -> ChatTokenResponse {
    match exchanger.exchange().await {
        Ok(token) => {
            let mut headers = HeaderMap::new();
            // Bearer credential; keep it out of shared caches.
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            Ok((StatusCode::OK, headers, Json(ChatToken { token })))
        }
        Err(ExchangeError::NotConfigured) => {
            error!("Direct Line secret not configured");
            Err(error_response("DirectLine secret not configured"))
        }
        Err(ExchangeError::Upstream(status)) => {
            error!("Direct Line token exchange answered {status}");
            Err(error_response("Failed to create Direct Line token"))
        }
        Err(ExchangeError::Transport(err)) => {
            error!("Direct Line token exchange failed: {err}");
            Err(error_response("Error creating Direct Line token"))
        }
    }
}

fn error_response(message: &str) -> (StatusCode, Json<ChatTokenError>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatTokenError {
            error: message.to_string(),
        }),
    )
}
