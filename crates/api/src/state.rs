use std::sync::Arc;

use generator::Generator;
use jobs::InMemJobs;
use store::InMemStore;

use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<InMemJobs<InMemStore>>,
    pub store: Arc<InMemStore>,
    /// Label for lessons saved as remote without one.
    pub remote_platform: Arc<str>,
}

impl AppState {
    pub fn new(store: InMemStore, generator: Generator) -> Self {
        let remote_platform = Arc::from(generator.config().remote_platform.as_str());
        let store = Arc::new(store);
        let jobs = InMemJobs::new(store.clone(), generator);
        Self {
            jobs: Arc::new(jobs),
            store,
            remote_platform,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = match &settings.catalog_path {
            Some(path) => InMemStore::from_json_file(path)?,
            None => InMemStore::default(),
        };
        Ok(Self::new(store, Generator::new(settings.generator.clone())))
    }
}
