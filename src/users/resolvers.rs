use async_graphql::{Context, ErrorExtensions, Object, Result};
use axum::extract::FromRef;

use super::{
    dto::{UpdateProfileInput, UserDto},
    services::UserService,
};
use crate::{auth::extractors::current_active_user, error::AppError, state::AppState};

fn to_dto(user: super::repo_types::User) -> Result<UserDto> {
    UserDto::utc(user).map_err(|e| AppError::Internal(e).extend())
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated user.
    async fn me(&self, ctx: &Context<'_>) -> Result<UserDto> {
        let user = current_active_user(ctx).await.map_err(|e| e.extend())?;
        to_dto(user)
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn update_profile(&self, ctx: &Context<'_>, input: UpdateProfileInput) -> Result<UserDto> {
        let me = current_active_user(ctx).await.map_err(|e| e.extend())?;
        let users = UserService::from_ref(ctx.data::<AppState>()?);
        let user = users
            .update_profile(me.id, input.into())
            .await
            .map_err(|e| e.extend())?;
        to_dto(user)
    }

    async fn change_password(
        &self,
        ctx: &Context<'_>,
        current_password: String,
        new_password: String,
    ) -> Result<bool> {
        let me = current_active_user(ctx).await.map_err(|e| e.extend())?;
        let users = UserService::from_ref(ctx.data::<AppState>()?);
        users
            .change_password(me.id, &current_password, &new_password)
            .await
            .map_err(|e| e.extend())?;
        Ok(true)
    }

    async fn delete_account(&self, ctx: &Context<'_>) -> Result<bool> {
        let me = current_active_user(ctx).await.map_err(|e| e.extend())?;
        let users = UserService::from_ref(ctx.data::<AppState>()?);
        users.soft_delete(me.id).await.map_err(|e| e.extend())?;
        Ok(true)
    }
}
