//! Database helpers for accounts and email verification codes.
//!
//! Expiry comparisons run on the database clock (`NOW()`), so application
//! hosts with skewed clocks cannot revive or shorten a code's lifetime.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::state::AuthConfig;
use super::utils::{generate_otp, hash_otp, is_unique_violation};

/// Outcome when attempting to create a new user + verification code.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created { user_id: Uuid, code: String },
    Conflict,
}

/// Outcome for a resend request. Unknown and already-verified accounts are
/// deliberately indistinguishable from a successful resend.
#[derive(Debug)]
pub(super) enum ResendOutcome {
    Issued { user_id: Uuid, code: String },
    Noop,
}

/// New account data, already validated and normalized.
pub(super) struct NewUser<'a> {
    pub(super) name: &'a str,
    pub(super) email: &'a str,
    pub(super) phone: Option<&'a str>,
    pub(super) password_hash: &'a str,
}

/// Fields needed to check a password login.
pub(super) struct LoginRecord {
    pub(super) user_id: Uuid,
    pub(super) name: String,
    pub(super) email: String,
    pub(super) password_hash: String,
    pub(super) verified: bool,
}

/// Latest verification code row for an email, expiry already evaluated by
/// the database clock.
pub(super) struct CodeRow {
    pub(super) code_id: Uuid,
    pub(super) user_id: Uuid,
    pub(super) otp_hash: String,
    pub(super) used: bool,
    pub(super) expired: bool,
}

/// Result of checking a submitted code against the stored row.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum CodeCheck {
    Valid,
    AlreadyUsed,
    Expired,
    Mismatch,
}

/// Decide the fate of a submitted code. Order matters: a used code reports
/// as used even when it is also expired.
pub(super) fn evaluate_code(row: &CodeRow, candidate: &str) -> CodeCheck {
    if row.used {
        return CodeCheck::AlreadyUsed;
    }
    if row.expired {
        return CodeCheck::Expired;
    }
    if row.otp_hash != hash_otp(candidate) {
        return CodeCheck::Mismatch;
    }
    CodeCheck::Valid
}

/// Fast-path duplicate check before hashing a password. The unique index on
/// `users.email` remains the authority; see [`insert_user_and_code`].
pub(super) async fn email_taken(pool: &PgPool, email: &str) -> Result<bool> {
    let query = "SELECT 1 FROM users WHERE email = $1 LIMIT 1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check email availability")?;

    Ok(row.is_some())
}

pub(super) async fn insert_user_and_code(
    pool: &PgPool,
    user: &NewUser<'_>,
    config: &AuthConfig,
) -> Result<SignupOutcome> {
    // Transaction keeps the account and its first verification code
    // consistent even if something fails.
    let mut tx = pool.begin().await.context("begin signup transaction")?;

    let user_id = Uuid::new_v4();
    let query = r"
        INSERT INTO users
            (id, name, email, phone, password_hash)
        VALUES ($1, $2, $3, $4, $5)
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(user_id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.password_hash)
        .execute(&mut *tx)
        .instrument(span)
        .await;

    if let Err(err) = result {
        if is_unique_violation(&err) {
            let _ = tx.rollback().await;
            return Ok(SignupOutcome::Conflict);
        }
        return Err(err).context("failed to insert user");
    }

    let code = insert_verification_code(&mut tx, user_id, config).await?;

    tx.commit().await.context("commit signup transaction")?;

    Ok(SignupOutcome::Created { user_id, code })
}

/// Insert a fresh verification code row and return the raw code for the
/// email; the database only ever sees the hash.
pub(super) async fn insert_verification_code(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
    config: &AuthConfig,
) -> Result<String> {
    let code = generate_otp();
    let code_hash = hash_otp(&code);

    let query = r"
        INSERT INTO email_verifications
            (id, user_id, otp_hash, expires_at)
        VALUES ($1, $2, $3, NOW() + ($4 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(code_hash)
        .bind(config.otp_ttl_seconds())
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("failed to insert verification code")?;

    Ok(code)
}

/// Look up password login data by normalized email.
pub(super) async fn lookup_login_record(pool: &PgPool, email: &str) -> Result<Option<LoginRecord>> {
    let query = r"
        SELECT id, name, email, password_hash,
               (email_verified_at IS NOT NULL) AS verified
        FROM users
        WHERE email = $1
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup login record")?;

    Ok(row.map(|row| LoginRecord {
        user_id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        verified: row.get("verified"),
    }))
}

/// Fetch the most recently issued code for an email. Issuing a new code
/// supersedes older ones because only the latest row is ever considered.
pub(super) async fn latest_code_for_email(pool: &PgPool, email: &str) -> Result<Option<CodeRow>> {
    let query = r"
        SELECT ev.id, ev.user_id, ev.otp_hash, ev.used,
               (NOW() >= ev.expires_at) AS expired
        FROM email_verifications ev
        JOIN users u ON u.id = ev.user_id
        WHERE u.email = $1
        ORDER BY ev.created_at DESC
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup verification code")?;

    Ok(row.map(|row| CodeRow {
        code_id: row.get("id"),
        user_id: row.get("user_id"),
        otp_hash: row.get("otp_hash"),
        used: row.get("used"),
        expired: row.get("expired"),
    }))
}

/// Flip the account to verified and burn the code in one transaction, so a
/// crash between the two writes cannot leave a reusable code behind.
pub(super) async fn mark_verified(pool: &PgPool, code_id: Uuid, user_id: Uuid) -> Result<()> {
    let mut tx = pool.begin().await.context("begin verification transaction")?;

    let query = r"
        UPDATE users
        SET email_verified_at = NOW(),
            updated_at = NOW()
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to mark user verified")?;

    let query = r"
        UPDATE email_verifications
        SET used = TRUE
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(code_id)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to mark verification code used")?;

    tx.commit().await.context("commit verification transaction")?;

    Ok(())
}

pub(super) async fn issue_resend_code(
    pool: &PgPool,
    email: &str,
    config: &AuthConfig,
) -> Result<ResendOutcome> {
    let mut tx = pool.begin().await.context("begin resend transaction")?;

    let query = r"
        SELECT id, (email_verified_at IS NOT NULL) AS verified
        FROM users
        WHERE email = $1
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(&mut *tx)
        .instrument(span)
        .await
        .context("failed to lookup user for resend")?;

    let Some(row) = row else {
        tx.commit().await.context("commit resend noop")?;
        return Ok(ResendOutcome::Noop);
    };

    let verified: bool = row.get("verified");
    if verified {
        tx.commit().await.context("commit resend noop")?;
        return Ok(ResendOutcome::Noop);
    }

    let user_id: Uuid = row.get("id");
    let code = insert_verification_code(&mut tx, user_id, config).await?;
    tx.commit().await.context("commit resend")?;

    Ok(ResendOutcome::Issued { user_id, code })
}
