use async_graphql::{Context, ErrorExtensions, Object, Result};
use axum::extract::FromRef;

use super::{claims::Claims, dto::AuthPayload, services::AuthService};
use crate::{state::AppState, users::dto::UserRegisterInput};

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    async fn register(&self, ctx: &Context<'_>, input: UserRegisterInput) -> Result<AuthPayload> {
        let auth = AuthService::from_ref(ctx.data::<AppState>()?);
        auth.register(input).await.map_err(|e| e.extend())
    }

    /// Every failure is reported with its message only.
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let auth = AuthService::from_ref(ctx.data::<AppState>()?);
        auth.login(&email, &password)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }
}

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    async fn validate_token(&self, ctx: &Context<'_>, token: String) -> Result<Claims> {
        let auth = AuthService::from_ref(ctx.data::<AppState>()?);
        auth.validate_token(&token).map_err(|e| e.extend())
    }
}
