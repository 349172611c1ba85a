/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL of the document store. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing session tokens. Env var: `ACCESS_TOKEN_SECRET`.
    pub token_secret: String,
    /// TCP port to listen on (default 3000). Env var: `PORT`.
    pub port: u16,
    /// Browser origins allowed to call the API with credentials.
    /// Env var: `ALLOWED_ORIGINS`, comma-separated (default `http://localhost:5173`).
    pub allowed_origins: Vec<String>,
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            token_secret: std::env::var("ACCESS_TOKEN_SECRET").expect("ACCESS_TOKEN_SECRET"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            allowed_origins: parse_origins(
                &std::env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_owned()),
            ),
        }
    }
}

/// Split a comma-separated origin list, trimming blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}
