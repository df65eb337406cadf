use crate::api::handlers::chat::DIRECTLINE_TOKEN_URL;
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_DIRECTLINE_SECRET: &str = "directline-secret";
pub const ARG_DIRECTLINE_URL: &str = "directline-url";

#[derive(Debug, Clone)]
pub struct Options {
    pub secret: Option<SecretString>,
    pub url: String,
}

impl Options {
    /// Parse Direct Line arguments from matches.
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        // Filter empty strings which clap might pass through if env vars are set to ""
        let secret = matches
            .get_one::<String>(ARG_DIRECTLINE_SECRET)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(SecretString::from);

        let url = matches
            .get_one::<String>(ARG_DIRECTLINE_URL)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DIRECTLINE_TOKEN_URL.to_string());

        Self { secret, url }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DIRECTLINE_SECRET)
                .long(ARG_DIRECTLINE_SECRET)
                .help("Direct Line channel secret used to mint per-user chat tokens")
                .long_help(
                    "Direct Line channel secret used to mint per-user chat tokens.\n\nThe secret stays on the server; clients only ever receive the short-lived token minted\nfrom it. When unset, POST /directline/token answers 500.",
                )
                .env("PORTIKO_DIRECTLINE_SECRET"),
        )
        .arg(
            Arg::new(ARG_DIRECTLINE_URL)
                .long(ARG_DIRECTLINE_URL)
                .help("Direct Line token generation endpoint")
                .env("PORTIKO_DIRECTLINE_URL")
                .default_value(DIRECTLINE_TOKEN_URL),
        )
}
