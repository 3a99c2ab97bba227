//! Application state

use ama_auth::{AuthConfig, CookieCodec, JwtManager};
use ama_db::Database;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Handle used to render the Prometheus exposition
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub cookies: Arc<CookieCodec>,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, cookies: Arc<CookieCodec>) -> Self {
        Self { db, jwt, cookies }
    }

    /// Build the token manager and cookie codec from one auth config
    pub fn from_auth_config(db: Database, config: &AuthConfig) -> Self {
        Self::new(
            db,
            Arc::new(JwtManager::new(config)),
            Arc::new(CookieCodec::new(config)),
        )
    }
}
