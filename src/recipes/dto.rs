use async_graphql::{InputObject, SimpleObject};

use super::repo_types::{Recipe, RecipeIngredient, RecipePatch};
use crate::timezone::rfc3339_utc;

#[derive(Debug, Clone, InputObject)]
pub struct CreateRecipeInput {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    #[graphql(default)]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateRecipeInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl From<UpdateRecipeInput> for RecipePatch {
    fn from(i: UpdateRecipeInput) -> Self {
        Self {
            title: i.title,
            description: i.description,
            image: i.image,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "RecipeIngredient")]
pub struct RecipeIngredientDto {
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<RecipeIngredient> for RecipeIngredientDto {
    type Error = anyhow::Error;

    fn try_from(r: RecipeIngredient) -> anyhow::Result<Self> {
        Ok(Self {
            id: r.id,
            recipe_id: r.recipe_id,
            ingredient: r.ingredient,
            created_at: rfc3339_utc(r.created_at)?,
            updated_at: rfc3339_utc(r.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Recipe")]
pub struct RecipeDto {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub ingredients: Vec<RecipeIngredientDto>,
}

impl RecipeDto {
    /// Timestamps are rendered as RFC 3339 in UTC, the same as `User`.
    pub fn new(recipe: Recipe, ingredients: Vec<RecipeIngredient>) -> anyhow::Result<Self> {
        Ok(Self {
            id: recipe.id,
            author_id: recipe.author_id,
            title: recipe.title,
            description: recipe.description,
            image: recipe.image,
            created_at: rfc3339_utc(recipe.created_at)?,
            updated_at: rfc3339_utc(recipe.updated_at)?,
            ingredients: ingredients
                .into_iter()
                .map(RecipeIngredientDto::try_from)
                .collect::<anyhow::Result<_>>()?,
        })
    }
}

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Clamps client paging arguments to sane bounds.
pub fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}
