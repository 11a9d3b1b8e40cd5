use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{CompanyRepository, JobRepository, Storage};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn Storage>,
    pub companies: CompanyRepository,
    pub jobs: JobRepository,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            companies: CompanyRepository::new(storage.clone()),
            jobs: JobRepository::new(storage.clone()),
            storage,
        }
    }
}
