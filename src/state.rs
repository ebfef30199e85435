// state.rs
use std::sync::Arc;
use std::time::Instant;

use crate::browser::Browsers;
use crate::config::Config;
use crate::services::ApiClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: ApiClient,
    pub browsers: Browsers,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let api = ApiClient::new(config.api_base_url.clone());

        Self {
            config: Arc::new(config),
            api,
            browsers: Browsers::default(),
            started_at: Instant::now(),
        }
    }
}
