//! Auth handlers and supporting modules.
//!
//! This module covers the account lifecycle: signup with an emailed one-time
//! code, verification of that code, password login and code resend.
//!
//! ## Verification codes
//!
//! Codes are six digits, live for ten minutes and are stored only as SHA-256
//! hashes. Issuing a new code supersedes older ones: verification always
//! checks the most recently created row for the address.
//!
//! ## Error shapes
//!
//! Signup, login and resend report failures as `{"ok": false, "code": ...}`
//! with stable codes. The OTP verification endpoint keeps its historical
//! `{"ok": false, "error": ...}` message shape.

pub(crate) mod error;
pub(crate) mod login;
pub(crate) mod resend;
pub(crate) mod session;
pub(crate) mod signup;
mod state;
mod storage;
pub(crate) mod types;
mod utils;
pub(crate) mod verify;

pub use session::{SessionClaims, SessionSigner};
pub use state::{AuthConfig, AuthState};
