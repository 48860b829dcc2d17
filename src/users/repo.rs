use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, ProfilePatch, User};
use crate::error::{AppError, AppResult};

const USER_COLUMNS: &str = "id, fullname, gender, email, password, birth_date, image, \
                            created_at, updated_at, deleted_at";

/// Persistence for user records. Lookups only ever return active rows.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;
    async fn create(&self, user: NewUser) -> AppResult<User>;
    async fn update_profile(&self, id: i32, patch: ProfilePatch) -> AppResult<Option<User>>;
    async fn update_password(&self, id: i32, password_hash: &str) -> AppResult<bool>;
    async fn soft_delete(&self, id: i32) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (fullname, gender, email, password, birth_date, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.fullname)
        .bind(&user.gender)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.birth_date)
        .bind(&user.image)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            // partial unique index on active emails
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::EmailTaken,
            other => AppError::Database(other),
        })?;
        Ok(created)
    }

    async fn update_profile(&self, id: i32, patch: ProfilePatch) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET fullname   = COALESCE($2, fullname),
                   gender     = COALESCE($3, gender),
                   birth_date = COALESCE($4, birth_date),
                   image      = COALESCE($5, image),
                   updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.fullname)
        .bind(patch.gender)
        .bind(patch.birth_date)
        .bind(patch.image)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE users SET password = $2, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn soft_delete(&self, id: i32) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE users SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
