//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::chat;
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(4000);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let session_secret = matches
        .get_one::<String>("session-secret")
        .cloned()
        .filter(|v| !v.trim().is_empty())
        .context("missing required argument: --session-secret")?;

    let frontend_origin = matches
        .get_one::<String>("frontend-origin")
        .cloned()
        .filter(|v| !v.trim().is_empty());

    let mail_from = matches
        .get_one::<String>("mail-from")
        .cloned()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "no-reply@example.com".to_string());

    let chat_opts = chat::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        dsn,
        frontend_origin,
        session_secret: SecretString::from(session_secret),
        mail_from,
        directline_secret: chat_opts.secret,
        directline_url: chat_opts.url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn session_secret_required() {
        temp_env::with_vars(
            [
                ("PORTIKO_SESSION_SECRET", None::<&str>),
                (
                    "PORTIKO_DSN",
                    Some("postgres://user@localhost:5432/portiko"),
                ),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["portiko"]);
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(
                        err.to_string()
                            .contains("missing required argument: --session-secret")
                    );
                }
            },
        );
    }

    #[test]
    fn maps_full_server_args() {
        temp_env::with_vars(
            [
                ("PORTIKO_PORT", Some("4100")),
                (
                    "PORTIKO_DSN",
                    Some("postgres://user@localhost:5432/portiko"),
                ),
                ("PORTIKO_SESSION_SECRET", Some("sekret")),
                ("PORTIKO_FRONTEND_ORIGIN", Some("https://app.example.com")),
                ("PORTIKO_MAIL_FROM", Some("hello@example.com")),
                ("PORTIKO_DIRECTLINE_SECRET", Some("dl-secret")),
                ("PORTIKO_DIRECTLINE_URL", Some("http://localhost:9090/mock")),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["portiko"]);
                let action = handler(&matches);
                assert!(action.is_ok());

                if let Ok(Action::Server(args)) = action {
                    assert_eq!(args.port, 4100);
                    assert_eq!(args.dsn, "postgres://user@localhost:5432/portiko");
                    assert_eq!(
                        args.frontend_origin.as_deref(),
                        Some("https://app.example.com")
                    );
                    assert_eq!(args.session_secret.expose_secret(), "sekret");
                    assert_eq!(args.mail_from, "hello@example.com");
                    assert_eq!(
                        args.directline_secret
                            .as_ref()
                            .map(ExposeSecret::expose_secret),
                        Some("dl-secret")
                    );
                    assert_eq!(args.directline_url, "http://localhost:9090/mock");
                }
            },
        );
    }

    #[test]
    fn empty_frontend_origin_is_unset() {
        temp_env::with_vars(
            [
                (
                    "PORTIKO_DSN",
                    Some("postgres://user@localhost:5432/portiko"),
                ),
                ("PORTIKO_SESSION_SECRET", Some("sekret")),
                ("PORTIKO_FRONTEND_ORIGIN", Some("  ")),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["portiko"]);
                let action = handler(&matches);
                assert!(action.is_ok());

                if let Ok(Action::Server(args)) = action {
                    assert!(args.frontend_origin.is_none());
                }
            },
        );
    }
}
