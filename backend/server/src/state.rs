use std::sync::Arc;

use tracing::info;

use super::{
    config::{Config, StoreBackend},
    database::RedisStore,
    memory::MemoryStore,
    recommend::{MockRecommender, Recommender},
    store::ReviewStore,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ReviewStore>,
    pub recommender: Arc<dyn Recommender>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Arc<Self>> {
        let config = Config::load()?;

        let store: Arc<dyn ReviewStore> = match config.store_backend {
            StoreBackend::Redis => Arc::new(
                RedisStore::connect(
                    &config.redis_url,
                    &config.redis_prefix,
                    config.redis_retries,
                    config.redis_timeout,
                )
                .await?,
            ),
            StoreBackend::Memory => Arc::new(MemoryStore::default()),
        };
        info!("Using {} review store", store.backend_tag());

        Ok(Arc::new(Self {
            config,
            store,
            recommender: Arc::new(MockRecommender::default()),
        }))
    }

    pub fn with_store(store: Arc<dyn ReviewStore>) -> Arc<Self> {
        Arc::new(Self {
            config: Config::default(),
            store,
            recommender: Arc::new(MockRecommender::default()),
        })
    }
}
