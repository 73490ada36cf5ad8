use std::{fmt, sync::Arc};

use wastetrack_config::Config;
use wastetrack_core::{
    database::CollectionLogRepository,
    domain::{CollectionService, DailySeeder},
};

type DynRepository = dyn CollectionLogRepository;

/// Shared handler state. The repository (and the pool behind it) is created
/// once at startup and cloned into every request through `Arc`s.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    repository: Arc<DynRepository>,
    collections: Arc<CollectionService<DynRepository>>,
    seeder: Arc<DailySeeder<DynRepository>>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Arc<Config>, repository: Arc<DynRepository>) -> Self {
        let boundary = config.day_boundary();
        let collections = CollectionService::new(Arc::clone(&repository), boundary)
            .with_collector_name(config.collection.collector_name.clone());
        let seeder = DailySeeder::new(Arc::clone(&repository), boundary);

        Self {
            config,
            repository,
            collections: Arc::new(collections),
            seeder: Arc::new(seeder),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &DynRepository {
        self.repository.as_ref()
    }

    pub fn collections(&self) -> &CollectionService<DynRepository> {
        &self.collections
    }

    pub fn seeder(&self) -> &DailySeeder<DynRepository> {
        &self.seeder
    }
}
