use std::{collections::HashMap, sync::Arc};

use axum::extract::FromRef;
use tracing::{info, instrument, warn};

use super::{
    dto::{page, CreateRecipeInput, RecipeDto},
    repo::RecipeStore,
    repo_types::{NewRecipe, Recipe, RecipeIngredient, RecipePatch},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

fn clean_line(line: &str, what: &str) -> AppResult<String> {
    let line = line.trim();
    if line.is_empty() {
        return Err(AppError::validation(format!("{what} must not be blank")));
    }
    Ok(line.to_string())
}

#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

impl FromRef<AppState> for RecipeService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.recipes.clone())
    }
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, author_id: i32, input: CreateRecipeInput) -> AppResult<RecipeDto> {
        let title = clean_line(&input.title, "Title")?;
        let ingredients = input
            .ingredients
            .iter()
            .map(|l| clean_line(l, "Ingredient"))
            .collect::<AppResult<Vec<_>>>()?;

        let (recipe, ingredients) = self
            .store
            .create(NewRecipe {
                author_id,
                title,
                description: input.description,
                image: input.image,
                ingredients,
            })
            .await?;
        info!(recipe_id = recipe.id, author_id, "recipe created");
        Ok(RecipeDto::new(recipe, ingredients)?)
    }

    pub async fn list(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Vec<RecipeDto>> {
        let (limit, offset) = page(limit, offset);
        let recipes = self.store.list(limit, offset).await?;
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
        let mut by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
        for ing in self.store.ingredients_for(&ids).await? {
            by_recipe.entry(ing.recipe_id).or_default().push(ing);
        }

        let listed = recipes
            .into_iter()
            .map(|r| {
                let ings = by_recipe.remove(&r.id).unwrap_or_default();
                RecipeDto::new(r, ings)
            })
            .collect::<anyhow::Result<_>>()?;
        Ok(listed)
    }

    pub async fn get(&self, id: i32) -> AppResult<RecipeDto> {
        let recipe = self.find(id).await?;
        let ingredients = self.store.ingredients_for(&[id]).await?;
        Ok(RecipeDto::new(recipe, ingredients)?)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, actor: i32, id: i32, mut patch: RecipePatch) -> AppResult<RecipeDto> {
        self.owned(actor, id).await?;
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(clean_line(title, "Title")?);
        }
        let recipe = self
            .store
            .update(id, patch)
            .await?
            .ok_or(AppError::NotFound("Recipe"))?;
        let ingredients = self.store.ingredients_for(&[id]).await?;
        info!(recipe_id = id, "recipe updated");
        Ok(RecipeDto::new(recipe, ingredients)?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: i32, id: i32) -> AppResult<()> {
        self.owned(actor, id).await?;
        if !self.store.soft_delete(id).await? {
            return Err(AppError::NotFound("Recipe"));
        }
        info!(recipe_id = id, "recipe soft deleted");
        Ok(())
    }

    #[instrument(skip(self, ingredient))]
    pub async fn add_ingredient(
        &self,
        actor: i32,
        recipe_id: i32,
        ingredient: &str,
    ) -> AppResult<RecipeIngredient> {
        let line = clean_line(ingredient, "Ingredient")?;
        self.owned(actor, recipe_id).await?;
        self.store.add_ingredient(recipe_id, &line).await
    }

    #[instrument(skip(self))]
    pub async fn remove_ingredient(&self, actor: i32, ingredient_id: i32) -> AppResult<()> {
        let ingredient = self
            .store
            .find_ingredient(ingredient_id)
            .await?
            .ok_or(AppError::NotFound("Ingredient"))?;
        self.owned(actor, ingredient.recipe_id).await?;
        if !self.store.remove_ingredient(ingredient_id).await? {
            return Err(AppError::NotFound("Ingredient"));
        }
        Ok(())
    }

    async fn find(&self, id: i32) -> AppResult<Recipe> {
        self.store
            .find(id)
            .await?
            .ok_or(AppError::NotFound("Recipe"))
    }

    async fn owned(&self, actor: i32, id: i32) -> AppResult<Recipe> {
        let recipe = self.find(id).await?;
        if recipe.author_id != actor {
            warn!(recipe_id = id, actor, author_id = recipe.author_id, "not the author");
            return Err(AppError::Forbidden("recipe"));
        }
        Ok(recipe)
    }
}
