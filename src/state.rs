use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::repo::{PgUserStore, UserStore},
    config::AppConfig,
    entries::{EntryStore, PgEntryStore},
    estimate::CalorieEstimator,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub entries: Arc<dyn EntryStore>,
    pub estimator: Arc<CalorieEstimator>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let entries = Arc::new(PgEntryStore::new(db.clone())) as Arc<dyn EntryStore>;
        Self::from_parts(db, config, users, entries)
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        entries: Arc<dyn EntryStore>,
    ) -> anyhow::Result<Self> {
        let estimator = Arc::new(CalorieEstimator::new(config.estimator.clone())?);
        Ok(Self {
            db,
            config,
            users,
            entries,
            estimator,
        })
    }
}
