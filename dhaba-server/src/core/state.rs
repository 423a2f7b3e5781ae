//! Shared server state

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use super::Config;
use crate::db::PosStorage;
use crate::orders::OrderManager;
use crate::summary::SummaryAggregator;

#[derive(Clone)]
pub struct ServerState {
    pub storage: PosStorage,
    pub manager: Arc<OrderManager>,
    pub aggregator: Arc<SummaryAggregator>,
}

impl ServerState {
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .with_context(|| format!("failed to create work dir {}", config.work_dir))?;

        let db_path = Path::new(&config.work_dir).join("dhaba.redb");
        let storage = PosStorage::open(&db_path)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        info!(path = %db_path.display(), "database opened");

        let tz = config.business_timezone;
        let manager = Arc::new(OrderManager::new(storage.clone(), tz));
        let aggregator = Arc::new(SummaryAggregator::new(storage.clone(), tz));

        Ok(Self {
            storage,
            manager,
            aggregator,
        })
    }
}
