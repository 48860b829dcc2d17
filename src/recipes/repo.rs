use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewRecipe, Recipe, RecipeIngredient, RecipePatch};
use crate::error::AppResult;

const RECIPE_COLUMNS: &str =
    "id, author_id, title, description, image, created_at, updated_at, deleted_at";
const INGREDIENT_COLUMNS: &str = "id, recipe_id, ingredient, created_at, updated_at, deleted_at";

/// Persistence for recipes and their ingredients. Reads skip soft-deleted rows.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn create(&self, recipe: NewRecipe) -> AppResult<(Recipe, Vec<RecipeIngredient>)>;
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Recipe>>;
    async fn find(&self, id: i32) -> AppResult<Option<Recipe>>;
    async fn ingredients_for(&self, recipe_ids: &[i32]) -> AppResult<Vec<RecipeIngredient>>;
    async fn update(&self, id: i32, patch: RecipePatch) -> AppResult<Option<Recipe>>;
    /// Soft deletes the recipe together with its ingredients.
    async fn soft_delete(&self, id: i32) -> AppResult<bool>;
    async fn add_ingredient(&self, recipe_id: i32, ingredient: &str)
        -> AppResult<RecipeIngredient>;
    async fn find_ingredient(&self, id: i32) -> AppResult<Option<RecipeIngredient>>;
    async fn remove_ingredient(&self, id: i32) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgRecipeStore {
    db: PgPool,
}

impl PgRecipeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn create(&self, recipe: NewRecipe) -> AppResult<(Recipe, Vec<RecipeIngredient>)> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let created = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (author_id, title, description, image)
            VALUES ($1, $2, $3, $4)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(recipe.author_id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.image)
        .fetch_one(&mut *tx)
        .await?;

        let mut ingredients = Vec::with_capacity(recipe.ingredients.len());
        for line in &recipe.ingredients {
            let row = sqlx::query_as::<_, RecipeIngredient>(&format!(
                r#"
                INSERT INTO recipe_ingredients (recipe_id, ingredient)
                VALUES ($1, $2)
                RETURNING {INGREDIENT_COLUMNS}
                "#
            ))
            .bind(created.id)
            .bind(line)
            .fetch_one(&mut *tx)
            .await?;
            ingredients.push(row);
        }

        tx.commit().await.context("commit tx")?;
        Ok((created, ingredients))
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
              FROM recipes
             WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn ingredients_for(&self, recipe_ids: &[i32]) -> AppResult<Vec<RecipeIngredient>> {
        let rows = sqlx::query_as::<_, RecipeIngredient>(&format!(
            r#"
            SELECT {INGREDIENT_COLUMNS}
              FROM recipe_ingredients
             WHERE recipe_id = ANY($1) AND deleted_at IS NULL
             ORDER BY id ASC
            "#
        ))
        .bind(recipe_ids.to_vec())
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i32, patch: RecipePatch) -> AppResult<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            UPDATE recipes
               SET title       = COALESCE($2, title),
                   description = COALESCE($3, description),
                   image       = COALESCE($4, image),
                   updated_at  = now()
             WHERE id = $1 AND deleted_at IS NULL
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.image)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: i32) -> AppResult<bool> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let res = sqlx::query(
            r#"
            UPDATE recipes SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if res.rows_affected() == 0 {
            tx.rollback().await.context("rollback tx")?;
            return Ok(false);
        }
        sqlx::query(
            r#"
            UPDATE recipe_ingredients SET deleted_at = now(), updated_at = now()
             WHERE recipe_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await.context("commit tx")?;
        Ok(true)
    }

    async fn add_ingredient(
        &self,
        recipe_id: i32,
        ingredient: &str,
    ) -> AppResult<RecipeIngredient> {
        let row = sqlx::query_as::<_, RecipeIngredient>(&format!(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient)
            VALUES ($1, $2)
            RETURNING {INGREDIENT_COLUMNS}
            "#
        ))
        .bind(recipe_id)
        .bind(ingredient)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_ingredient(&self, id: i32) -> AppResult<Option<RecipeIngredient>> {
        let row = sqlx::query_as::<_, RecipeIngredient>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM recipe_ingredients \
             WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn remove_ingredient(&self, id: i32) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE recipe_ingredients SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
