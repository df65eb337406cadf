//! Outbound email.
//!
//! The server only ever sends one kind of message, the verification code
//! email, so the surface is small: a message value, a sender trait and a
//! log-backed sender used when no transport is wired up. Handlers depend on
//! the trait, which keeps them testable without a mail server.

use anyhow::Result;
use tracing::info;

/// A rendered email, ready for a transport.
#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Delivery backend for outbound email.
pub trait EmailSender: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Sender that writes the message to the log instead of delivering it.
///
/// Used when no mail transport is configured. The body is logged in full so
/// verification codes remain reachable during development.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to = %message.to,
            from = %message.from,
            subject = %message.subject,
            body = %message.body,
            "mail transport not configured, logging message"
        );

        Ok(())
    }
}

/// Build the verification code email for a signup or resend.
#[must_use]
pub fn verification_message(to: &str, from: &str, code: &str, ttl_seconds: i64) -> EmailMessage {
    let minutes = (ttl_seconds / 60).max(1);

    EmailMessage {
        to: to.to_string(),
        from: from.to_string(),
        subject: "Your verification code".to_string(),
        body: format!(
            "Thank you for signing up.\n\n\
             Your email verification code is: {code}\n\n\
             This code is valid for {minutes} minutes.\n"
        ),
    }
}
