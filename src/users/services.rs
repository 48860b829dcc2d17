use std::sync::Arc;

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    dto::UserRegisterInput,
    repo::UserStore,
    repo_types::{NewUser, ProfilePatch, User},
};
use crate::{
    auth::password::{hash_password, validate_existing_user},
    error::{AppError, AppResult},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Password too short"));
    }
    Ok(())
}

/// Orchestrates user record lookup and mutation.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone())
    }
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: UserRegisterInput) -> AppResult<User> {
        let email = normalize_email(&input.email);
        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(AppError::validation("Invalid email"));
        }
        check_password(&input.password)?;
        let fullname = input.fullname.trim().to_string();
        if fullname.is_empty() {
            return Err(AppError::validation("Fullname is required"));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(AppError::EmailTaken);
        }

        let password = hash_password(&input.password)?;
        let user = self
            .store
            .create(NewUser {
                fullname,
                gender: input.gender.trim().to_string(),
                email,
                password,
                birth_date: input.birth_date,
                image: input.image,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    /// Active user with this email, if any.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.store.find_by_email(&normalize_email(email)).await
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<User> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, id: i32, mut patch: ProfilePatch) -> AppResult<User> {
        if let Some(name) = patch.fullname.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Fullname is required"));
            }
        }
        let user = self
            .store
            .update_profile(id, patch)
            .await?
            .ok_or(AppError::UserNotFound)?;
        info!(user_id = id, "profile updated");
        Ok(user)
    }

    #[instrument(skip(self, current, new))]
    pub async fn change_password(&self, id: i32, current: &str, new: &str) -> AppResult<()> {
        let user = validate_existing_user(self.store.find_by_id(id).await?, current)?;
        check_password(new)?;
        let hash = hash_password(new)?;
        if !self.store.update_password(user.id, &hash).await? {
            return Err(AppError::UserNotFound);
        }
        info!(user_id = id, "password changed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        if !self.store.soft_delete(id).await? {
            return Err(AppError::UserNotFound);
        }
        info!(user_id = id, "user soft deleted");
        Ok(())
    }
}
