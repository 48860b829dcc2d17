use async_graphql::{Context, ErrorExtensions, Object, Result};
use axum::extract::FromRef;

use super::{
    dto::{CreateRecipeInput, RecipeDto, RecipeIngredientDto, UpdateRecipeInput},
    services::RecipeService,
};
use crate::{auth::extractors::current_active_user, error::AppError, state::AppState};

#[derive(Default)]
pub struct RecipeQuery;

#[Object]
impl RecipeQuery {
    async fn recipes(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<RecipeDto>> {
        let recipes = RecipeService::from_ref(ctx.data::<AppState>()?);
        recipes.list(limit, offset).await.map_err(|e| e.extend())
    }

    async fn recipe(&self, ctx: &Context<'_>, id: i32) -> Result<RecipeDto> {
        let recipes = RecipeService::from_ref(ctx.data::<AppState>()?);
        recipes.get(id).await.map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct RecipeMutation;

#[Object]
impl RecipeMutation {
    async fn create_recipe(&self, ctx: &Context<'_>, input: CreateRecipeInput) -> Result<RecipeDto> {
        let me = current_active_user(ctx).await.map_err(|e| e.extend())?;
        let recipes = RecipeService::from_ref(ctx.data::<AppState>()?);
        recipes.create(me.id, input).await.map_err(|e| e.extend())
    }

    async fn update_recipe(
        &self,
        ctx: &Context<'_>,
        id: i32,
        input: UpdateRecipeInput,
    ) -> Result<RecipeDto> {
        let me = current_active_user(ctx).await.map_err(|e| e.extend())?;
        let recipes = RecipeService::from_ref(ctx.data::<AppState>()?);
        recipes
            .update(me.id, id, input.into())
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_recipe(&self, ctx: &Context<'_>, id: i32) -> Result<bool> {
        let me = current_active_user(ctx).await.map_err(|e| e.extend())?;
        let recipes = RecipeService::from_ref(ctx.data::<AppState>()?);
        recipes.delete(me.id, id).await.map_err(|e| e.extend())?;
        Ok(true)
    }

    async fn add_recipe_ingredient(
        &self,
        ctx: &Context<'_>,
        recipe_id: i32,
        ingredient: String,
    ) -> Result<RecipeIngredientDto> {
        let me = current_active_user(ctx).await.map_err(|e| e.extend())?;
        let recipes = RecipeService::from_ref(ctx.data::<AppState>()?);
        let row = recipes
            .add_ingredient(me.id, recipe_id, &ingredient)
            .await
            .map_err(|e| e.extend())?;
        RecipeIngredientDto::try_from(row).map_err(|e| AppError::Internal(e).extend())
    }

    async fn remove_recipe_ingredient(&self, ctx: &Context<'_>, id: i32) -> Result<bool> {
        let me = current_active_user(ctx).await.map_err(|e| e.extend())?;
        let recipes = RecipeService::from_ref(ctx.data::<AppState>()?);
        recipes
            .remove_ingredient(me.id, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(true)
    }
}
