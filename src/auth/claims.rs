use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// JWT payload issued on register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "TokenClaims")]
pub struct Claims {
    pub sub: i32,      // user ID
    pub email: String, // login email at signing time
    pub iat: i64,      // issued at (unix timestamp)
    pub exp: i64,      // expires at (unix timestamp)
    pub iss: String,   // issuer
    pub aud: String,   // audience
}
