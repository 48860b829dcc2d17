use async_graphql::SimpleObject;

use crate::users::dto::UserDto;

/// Result of a successful register or login, not persisted.
#[derive(Debug, Clone, SimpleObject)]
pub struct AuthPayload {
    pub user: UserDto,
    pub token: String,
}
