//! # Portiko (Email Verification & Authentication Backend)
//!
//! `portiko` is the account backend for the web frontend. It handles signup,
//! email verification by one-time code, login with signed session tokens, and
//! server-side Direct Line chat token exchange.
//!
//! ## Accounts & Verification
//!
//! Signup stores the user with an argon2 password hash and immediately issues a
//! six-digit verification code, delivered by email and stored only as a SHA-256
//! digest.
//!
//! - **Single use:** A code row is consumed on first successful verification;
//!   replaying it answers `OTP already used`.
//! - **Expiry:** Codes expire ten minutes after they are issued, judged against
//!   the database clock.
//! - **Latest wins:** Only the most recently issued code for an address is
//!   checked; resending invalidates nothing but older codes stop matching.
//!
//! ## Sessions
//!
//! Login answers a signed `HS256` token (seven days) carrying the user id,
//! email and name. Login is refused with a stable `EMAIL_NOT_VERIFIED` code
//! until the address is verified, and unknown users and wrong passwords are
//! indistinguishable (`INVALID_CREDENTIALS`).
//!
//! ## Chat Tokens
//!
//! The Direct Line channel secret stays on the server. Clients `POST
//! /directline/token` and receive a short-lived per-conversation token
//! minted upstream; the secret itself is never written to responses or logs.

pub mod api;
pub mod cli;
pub mod mail;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
