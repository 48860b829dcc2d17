use serde::Deserialize;

const DEFAULT_TTL_MINUTES: i64 = 60 * 24;
const MAX_TTL_MINUTES: i64 = 60 * 24 * 366;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub graphql_playground: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cookbook-api".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cookbook-users".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };
        let graphql_playground = std::env::var("GRAPHQL_PLAYGROUND")
            .map(|v| !matches!(v.as_str(), "0" | "false" | "off"))
            .unwrap_or(true);
        Ok(Self {
            database_url,
            jwt,
            graphql_playground,
        })
    }
}

/// `JWT_TTL_MINUTES`: unset means one day; anything else must be 1..=366 days.
fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let minutes: i64 = match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => anyhow::bail!("JWT_TTL_MINUTES must be a whole number of minutes, got {raw:?}"),
    };
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}
