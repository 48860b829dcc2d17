use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};
use crate::users::repo_types::User;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Credential check shared by login and password change: the user must exist
/// and `password` must match the stored hash.
pub fn validate_existing_user(user: Option<User>, password: &str) -> AppResult<User> {
    let user = user.ok_or(AppError::UserNotFound)?;
    if !verify_password(password, &user.password)? {
        warn!(user_id = user.id, "password mismatch");
        return Err(AppError::WrongPassword);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn user_with_password(plain: &str) -> User {
        User {
            id: 7,
            fullname: "Siti Aminah".into(),
            gender: "female".into(),
            email: "siti@example.com".into(),
            password: hash_password(plain).expect("hashing should succeed"),
            birth_date: date!(1995 - 04 - 12),
            image: None,
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00 UTC),
            deleted_at: None,
        }
    }

    #[test]
    fn hash_is_salted() {
        let a = hash_password("Secur3P@ssw0rd!").unwrap();
        let b = hash_password("Secur3P@ssw0rd!").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("Secur3P@ssw0rd!", &a).unwrap());
        assert!(!verify_password("wrong-password", &b).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn validate_existing_user_accepts_matching_password() {
        let user = user_with_password("correct-horse-battery");
        let ok = validate_existing_user(Some(user), "correct-horse-battery").unwrap();
        assert_eq!(ok.id, 7);
    }

    #[test]
    fn validate_existing_user_rejects_missing_user() {
        let err = validate_existing_user(None, "whatever").unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[test]
    fn validate_existing_user_rejects_wrong_password() {
        let user = user_with_password("correct-horse-battery");
        let err = validate_existing_user(Some(user), "incorrect").unwrap_err();
        assert!(matches!(err, AppError::WrongPassword));
    }
}
