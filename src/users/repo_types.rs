use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// User record in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub fullname: String,
    pub gender: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // Argon2 hash, not exposed in JSON
    pub birth_date: Date,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>, // set = logically removed
}

/// Values for a new row; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub gender: String,
    pub email: String,
    pub password: String,
    pub birth_date: Date,
    pub image: Option<String>,
}

/// Partial profile update, `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub fullname: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<Date>,
    pub image: Option<String>,
}
