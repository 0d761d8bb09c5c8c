use std::{fmt, sync::Arc};

use routine_config::Config;
use routine_core::CompanyService;

#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<CompanyService>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("companies", &self.companies)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(companies: CompanyService, config: Config) -> Self {
        Self {
            companies: Arc::new(companies),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
