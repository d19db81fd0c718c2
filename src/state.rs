use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let store = if config.uses_memory_store() {
            tracing::warn!("using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new()) as Arc<dyn Store>
        } else {
            let pg = PgStore::connect(&config.database_url).await?;
            if let Err(e) = pg.migrate().await {
                tracing::warn!(error = %e, "migrations failed; continuing");
            }
            Arc::new(pg) as Arc<dyn Store>
        };

        Ok(Self { store, config })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        let config = Arc::new(AppConfig {
            database_url: crate::config::MEMORY_DATABASE_URL.into(),
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            host: "127.0.0.1".into(),
            port: 0,
        });
        Self {
            store: Arc::new(MemoryStore::new()),
            config,
        }
    }
}
