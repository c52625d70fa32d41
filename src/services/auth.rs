use anyhow::Context;
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::queries;
use crate::models::AdminCredential;

/// Auth failures keep the original API's distinguishable messages; the
/// Display text is what goes on the wire.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid Username or Email")]
    InvalidIdentity,

    #[error("Incorrect Security Answer")]
    WrongAnswer,

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

pub fn verify_login(conn: &Connection, username: &str, password: &str) -> Result<(), AuthError> {
    let admin =
        queries::get_admin_by_username(conn, username)?.ok_or(AuthError::UserNotFound)?;

    let matches = bcrypt::verify(password, &admin.password_hash)
        .context("failed to verify password digest")?;
    if !matches {
        return Err(AuthError::InvalidPassword);
    }
    Ok(())
}

/// Challenge-based recovery: identity pair, then security answer, then a
/// freshly salted digest of the new password. A failed attempt leaves the
/// stored digest untouched.
pub fn reset_password(
    conn: &Connection,
    username: &str,
    email: &str,
    security_answer: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    let admin =
        queries::get_admin_by_identity(conn, username, email)?.ok_or(AuthError::InvalidIdentity)?;

    let matches = bcrypt::verify(security_answer, &admin.security_answer_hash)
        .context("failed to verify security answer digest")?;
    if !matches {
        return Err(AuthError::WrongAnswer);
    }

    let password_hash =
        bcrypt::hash(new_password, bcrypt::DEFAULT_COST).context("failed to hash password")?;
    queries::update_admin_password(conn, &admin.username, &password_hash)?;
    Ok(())
}

#[derive(Debug, PartialEq)]
pub enum SeedOutcome {
    Created,
    AlreadyExists,
    SecretsMissing,
}

/// One-time credential seeding at startup. Runs only while zero credential
/// rows exist, so the postcondition is always zero or one rows. Absent
/// secrets skip seeding: no admin exists and login fails until they are
/// provided.
pub fn seed_admin(conn: &Connection, config: &AppConfig) -> anyhow::Result<SeedOutcome> {
    if queries::count_admins(conn)? > 0 {
        return Ok(SeedOutcome::AlreadyExists);
    }

    let (Some(username), Some(password), Some(email), Some(answer)) = (
        config.admin_username.as_deref(),
        config.admin_password.as_deref(),
        config.admin_email.as_deref(),
        config.admin_security_answer.as_deref(),
    ) else {
        return Ok(SeedOutcome::SecretsMissing);
    };

    // Each hash call generates its own salt, so the two digests never share one.
    let password_hash =
        bcrypt::hash(password, bcrypt::DEFAULT_COST).context("failed to hash password")?;
    let security_answer_hash =
        bcrypt::hash(answer, bcrypt::DEFAULT_COST).context("failed to hash security answer")?;

    queries::insert_admin(
        conn,
        &AdminCredential {
            username: username.to_string(),
            password_hash,
            email: email.to_string(),
            security_answer_hash,
        },
    )?;

    Ok(SeedOutcome::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn seeded_config() -> AppConfig {
        AppConfig {
            port: 5000,
            database_url: ":memory:".to_string(),
            allow_decision_reversal: true,
            admin_username: Some("admin".to_string()),
            admin_password: Some("hunter2".to_string()),
            admin_email: Some("admin@example.com".to_string()),
            admin_security_answer: Some("first pet".to_string()),
        }
    }

    #[test]
    fn test_seed_without_secrets_is_a_noop() {
        let conn = setup_db();
        let config = AppConfig {
            admin_password: None,
            ..seeded_config()
        };

        assert_eq!(seed_admin(&conn, &config).unwrap(), SeedOutcome::SecretsMissing);
        assert_eq!(queries::count_admins(&conn).unwrap(), 0);

        // With no admin, any login fails as unknown user.
        let err = verify_login(&conn, "admin", "hunter2").unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[test]
    fn test_seed_creates_exactly_one_admin() {
        let conn = setup_db();
        let config = seeded_config();

        assert_eq!(seed_admin(&conn, &config).unwrap(), SeedOutcome::Created);
        assert_eq!(seed_admin(&conn, &config).unwrap(), SeedOutcome::AlreadyExists);
        assert_eq!(queries::count_admins(&conn).unwrap(), 1);

        let admin = queries::get_admin_by_username(&conn, "admin")
            .unwrap()
            .unwrap();
        // Digests, never plaintext, and independently salted.
        assert_ne!(admin.password_hash, "hunter2");
        assert_ne!(admin.security_answer_hash, "first pet");
        assert_ne!(admin.password_hash, admin.security_answer_hash);
    }

    #[test]
    fn test_login_wrong_password_is_not_unknown_user() {
        let conn = setup_db();
        seed_admin(&conn, &seeded_config()).unwrap();

        verify_login(&conn, "admin", "hunter2").unwrap();

        let err = verify_login(&conn, "admin", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));

        let err = verify_login(&conn, "nobody", "hunter2").unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[test]
    fn test_reset_requires_matching_identity_pair() {
        let conn = setup_db();
        seed_admin(&conn, &seeded_config()).unwrap();

        let err = reset_password(&conn, "admin", "other@example.com", "first pet", "new-pass")
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidIdentity));
    }

    #[test]
    fn test_reset_wrong_answer_keeps_old_password() {
        let conn = setup_db();
        seed_admin(&conn, &seeded_config()).unwrap();

        let err = reset_password(&conn, "admin", "admin@example.com", "wrong", "new-pass")
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongAnswer));

        // Old password still verifies.
        verify_login(&conn, "admin", "hunter2").unwrap();
    }

    #[test]
    fn test_reset_replaces_password() {
        let conn = setup_db();
        seed_admin(&conn, &seeded_config()).unwrap();

        reset_password(&conn, "admin", "admin@example.com", "first pet", "new-pass").unwrap();

        verify_login(&conn, "admin", "new-pass").unwrap();
        let err = verify_login(&conn, "admin", "hunter2").unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));
    }
}
