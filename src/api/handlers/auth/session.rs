//! Session tokens for logged-in users.
//!
//! Tokens are HS256 JWTs signed with a server-side secret. The claims carry
//! the user id plus the display fields the frontend renders, so a page load
//! does not need a round trip to the database.

use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::utils::now_unix_seconds;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates session tokens with a single shared secret.
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl SessionSigner {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl_seconds,
        }
    }

    /// Sign a session token for a freshly authenticated user.
    pub fn issue(&self, user_id: Uuid, email: &str, name: &str) -> Result<String> {
        let now = now_unix_seconds();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("failed to sign session token")
    }

    /// Validate a session token and return its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .context("invalid session token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(ttl_seconds: i64) -> SessionSigner {
        SessionSigner::new(&SecretString::from("test-session-secret"), ttl_seconds)
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let signer = signer(7 * 24 * 60 * 60);
        let user_id = Uuid::new_v4();

        let token = signer.issue(user_id, "ada@example.com", "Ada").unwrap();
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.name, "Ada");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = signer(3600)
            .issue(Uuid::new_v4(), "ada@example.com", "Ada")
            .unwrap();

        let other = SessionSigner::new(&SecretString::from("another-secret"), 3600);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        // negative TTL larger than the default 60s validation leeway
        let token = signer(-120)
            .issue(Uuid::new_v4(), "ada@example.com", "Ada")
            .unwrap();

        assert!(signer(3600).verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(signer(3600).verify("not-a-jwt").is_err());
    }
}
