//! Account creation, password checks and the caller identity passed into a session.
//!
//! Passwords are stored as Argon2id PHC strings; salt and parameters live inside the
//! stored hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::models::{Role, User};
use crate::db::operations;
use crate::error::{ForgeError, Result};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Who is calling. Admin rights come from the stored role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub role: Role,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<()> {
        if !self.is_admin() {
            return Err(ForgeError::Forbidden(
                "this action needs an administrator".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&User> for UserContext {
    fn from(user: &User) -> Self {
        UserContext::new(user.id.clone(), user.role)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ForgeError::PasswordHash(e.to_string()))
}

/// `Ok(false)` on a wrong password; errors only for an unreadable stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| ForgeError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ForgeError::PasswordHash(e.to_string())),
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ForgeError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ForgeError::Validation(format!(
            "{} is not a valid email address",
            email
        ))),
    }
}

pub async fn signup(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<User> {
    signup_with_role(pool, email, password, display_name, Role::User).await
}

pub async fn signup_with_role(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    display_name: &str,
    role: Role,
) -> Result<User> {
    validate_email(email)?;
    validate_password(password)?;
    if display_name.trim().is_empty() {
        return Err(ForgeError::Validation("Please enter your name".to_string()));
    }

    let hash = hash_password(password)?;
    let row = operations::create_user(pool, email, &hash, display_name, role.as_str()).await?;
    info!("Created {} account {}", role.as_str(), row.id);
    User::try_from(row)
}

/// Checks credentials. Unknown email and wrong password fail the same way.
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> Result<UserContext> {
    let Some(row) = operations::get_user_by_email(pool, email).await? else {
        warn!("Login attempt for unknown email");
        return Err(ForgeError::Unauthorized);
    };
    if !verify_password(password, &row.password_hash)? {
        warn!("Failed login for user {}", row.id);
        return Err(ForgeError::Unauthorized);
    }
    let user = User::try_from(row)?;
    Ok(UserContext::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct-horse-battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse-battery", &hash).unwrap());
        assert!(!verify_password("wrong-horse-battery", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("anything", "plaintext"),
            Err(ForgeError::PasswordHash(_))
        ));
    }

    #[test]
    fn credential_rules() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
        assert!(validate_email("lifter@example.com").is_ok());
        assert!(validate_email("lifter").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn only_admins_pass_admin_check() {
        assert!(UserContext::new("a", Role::Admin).require_admin().is_ok());
        assert!(matches!(
            UserContext::new("u", Role::User).require_admin(),
            Err(ForgeError::Forbidden(_))
        ));
    }
}
