//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::services::agent::{self, AgentClient};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// Every field is cheap to clone: `PgPool` and the JWT keys are
/// internally reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Plan-generation agent service
    pub agent: Arc<dyn AgentClient>,
    /// Prometheus exposition, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Call once at startup: this derives the JWT keys and builds the
    /// agent HTTP client.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);
        let agent = agent::client_from_config(&config.agent);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            agent,
            metrics: None,
        }
    }

    /// Replace the agent client (used by tests)
    pub fn with_agent(mut self, agent: Arc<dyn AgentClient>) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn agent(&self) -> &dyn AgentClient {
        self.agent.as_ref()
    }
}
