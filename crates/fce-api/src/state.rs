use std::sync::Arc;

use fce_srs::Scheduler;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::{
    ApiConfig, Clock, collection::Collection, config::Environment, error::ApiError, metrics,
};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    /// Writers go through [`ApiState::update`], which holds the lock across the save
    pub collection: Arc<RwLock<Collection>>,
    pub scheduler: Scheduler,
    pub environment: Environment,
    pub clock: Clock,
}

impl ApiState {
    /// Build the state from configuration, loading the saved collection.
    pub async fn new(config: &ApiConfig, pool: SqlitePool) -> anyhow::Result<Self> {
        let scheduler = config.scheduler()?;
        let saved = fce_db::load_state(&pool).await;

        tracing::info!(utc_offset = %scheduler.offset(), "Days start at local midnight");

        Ok(Self::from_parts(
            pool,
            Collection::new(saved, scheduler),
            config.env,
            Clock::System,
        ))
    }

    pub fn from_parts(
        pool: SqlitePool,
        collection: Collection,
        environment: Environment,
        clock: Clock,
    ) -> Self {
        Self {
            pool,
            scheduler: *collection.scheduler(),
            collection: Arc::new(RwLock::new(collection)),
            environment,
            clock,
        }
    }

    /// Apply a change to a copy of the collection and keep it only once it
    /// has been saved; a failed save leaves the collection untouched.
    pub async fn update<T>(
        &self,
        change: impl FnOnce(&mut Collection) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut collection = self.collection.write().await;

        let mut draft = collection.clone();
        let value = change(&mut draft)?;
        self.persist(&draft).await?;

        *collection = draft;
        Ok(value)
    }

    /// Empty the store, then the collection.
    pub async fn reset(&self) -> Result<(), ApiError> {
        let mut collection = self.collection.write().await;

        let result = fce_db::clear_state(&self.pool).await;
        metrics::record_store_write(result.is_ok());
        result?;

        collection.reset();
        Ok(())
    }

    async fn persist(&self, collection: &Collection) -> Result<(), ApiError> {
        let result = fce_db::save_state(&self.pool, collection.state()).await;
        metrics::record_store_write(result.is_ok());
        result.map_err(ApiError::from)
    }
}
