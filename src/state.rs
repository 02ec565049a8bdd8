use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::session::SessionManager;
use crate::config::AppConfig;
use crate::store::{MemStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionManager,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env());
        let store: Arc<dyn Store> = match config.database_url.as_deref() {
            Some(url) => Arc::new(PgStore::connect(url).await?),
            None => {
                tracing::warn!("DATABASE_URL not set; using the in-memory store");
                Arc::new(MemStore::new())
            }
        };
        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self {
            store,
            sessions: SessionManager::new(),
            config,
        }
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
