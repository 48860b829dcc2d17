use async_graphql::{InputObject, SimpleObject};
use time::{Date, OffsetDateTime};

use super::repo_types::{ProfilePatch, User};
use crate::timezone::{rfc3339_utc, utc_to_asia_jakarta};

/// Arguments of the `register` mutation.
#[derive(Debug, Clone, InputObject)]
pub struct UserRegisterInput {
    pub fullname: String,
    pub gender: String,
    pub email: String,
    pub password: String,
    pub birth_date: Date,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateProfileInput {
    pub fullname: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<Date>,
    pub image: Option<String>,
}

impl From<UpdateProfileInput> for ProfilePatch {
    fn from(i: UpdateProfileInput) -> Self {
        Self {
            fullname: i.fullname,
            gender: i.gender,
            birth_date: i.birth_date,
            image: i.image,
        }
    }
}

/// Public part of the user returned to the client. Never carries the hash.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct UserDto {
    pub id: i32,
    pub fullname: String,
    pub gender: String,
    pub email: String,
    pub birth_date: Date,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserDto {
    fn render(
        user: User,
        fmt: fn(OffsetDateTime) -> anyhow::Result<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            created_at: fmt(user.created_at)?,
            updated_at: fmt(user.updated_at)?,
            id: user.id,
            fullname: user.fullname,
            gender: user.gender,
            email: user.email,
            birth_date: user.birth_date,
            image: user.image,
        })
    }

    /// Timestamps as RFC 3339 UTC.
    pub fn utc(user: User) -> anyhow::Result<Self> {
        Self::render(user, rfc3339_utc)
    }

    /// Timestamps as Asia/Jakarta wall-clock time.
    pub fn jakarta(user: User) -> anyhow::Result<Self> {
        Self::render(user, utc_to_asia_jakarta)
    }
}
