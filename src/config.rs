#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string. When absent the server runs against the
    /// in-memory store, which is enough for local development and tests.
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }
}
