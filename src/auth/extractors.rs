use std::{convert::Infallible, sync::Arc};

use async_graphql::Context;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{repo_types::User, services::UserService},
};

/// Identity behind a GraphQL request, resolved from the `Authorization` header.
///
/// A missing or broken header is not rejected at the HTTP layer: public
/// operations such as `login` must keep working, so the outcome is attached to
/// the request and only fields that need a user fail.
#[derive(Debug, Clone)]
pub enum Viewer {
    Anonymous,
    Authenticated(Claims),
    Rejected,
}

impl Viewer {
    pub fn from_header(keys: &JwtKeys, header: Option<&str>) -> Self {
        let Some(value) = header else {
            return Viewer::Anonymous;
        };
        let Some(token) = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
        else {
            warn!("invalid auth scheme");
            return Viewer::Rejected;
        };
        match keys.verify(token.trim()) {
            Ok(claims) => Viewer::Authenticated(claims),
            Err(_) => Viewer::Rejected,
        }
    }

    pub fn require(&self) -> AppResult<&Claims> {
        match self {
            Viewer::Authenticated(claims) => Ok(claims),
            Viewer::Anonymous => Err(AppError::Unauthorized),
            Viewer::Rejected => Err(AppError::InvalidToken),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
    Arc<JwtKeys>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = Arc::<JwtKeys>::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        Ok(Viewer::from_header(&keys, header))
    }
}

/// Claims of the caller, or the reason there are none.
pub fn current_user<'a>(ctx: &'a Context<'_>) -> AppResult<&'a Claims> {
    match ctx.data_opt::<Viewer>() {
        Some(viewer) => viewer.require(),
        None => Err(AppError::Unauthorized),
    }
}

/// The caller's user record. A valid token whose account is gone or soft
/// deleted counts as an invalid token.
pub async fn current_active_user(ctx: &Context<'_>) -> AppResult<User> {
    let claims = current_user(ctx)?;
    let state = ctx
        .data::<AppState>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.message)))?;
    UserService::from_ref(state)
        .find_by_id(claims.sub)
        .await
        .map_err(|e| match e {
            AppError::UserNotFound => {
                warn!(user_id = claims.sub, "token for inactive user");
                AppError::InvalidToken
            }
            other => other,
        })
}
