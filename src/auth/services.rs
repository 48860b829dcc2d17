use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{error, info, instrument, warn};

use super::{claims::Claims, dto::AuthPayload, jwt::JwtKeys, password::validate_existing_user};
use crate::{
    error::AppResult,
    state::AppState,
    users::{
        dto::{UserDto, UserRegisterInput},
        services::UserService,
    },
};

/// Issues and validates bearer tokens tied to a user identity.
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    keys: Arc<JwtKeys>,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(UserService::from_ref(state), state.jwt.clone())
    }
}

impl AuthService {
    pub fn new(users: UserService, keys: Arc<JwtKeys>) -> Self {
        Self { users, keys }
    }

    /// Creates the user, then signs a token for it. Creation errors are
    /// returned as they are.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: UserRegisterInput) -> AppResult<AuthPayload> {
        let user = self.users.create(input).await?;
        let token = self.keys.sign(user.id, &user.email)?;
        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(AuthPayload {
            user: UserDto::utc(user)?,
            token,
        })
    }

    /// Checks credentials and signs a token. The returned user carries
    /// Asia/Jakarta display timestamps.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        let found = self.users.find_by_email(email).await?;
        let user = validate_existing_user(found, password).map_err(|e| {
            if e.is_auth_failure() {
                warn!(%email, error = %e, "login rejected");
            } else {
                error!(%email, error = %e, "login failed");
            }
            e
        })?;

        let token = self.keys.sign(user.id, &user.email)?;
        info!(user_id = user.id, email = %user.email, "user logged in");
        Ok(AuthPayload {
            user: UserDto::jakarta(user)?,
            token,
        })
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        self.keys.verify(token)
    }
}
