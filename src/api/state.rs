//! Application state shared by all handlers.

use std::sync::Arc;

use crate::infra::{CacheStore, Database};
use crate::services::{AuthService, ContactService, ServiceContainer};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Contact service
    pub contact_service: Arc<dyn ContactService>,
    /// Cache, checked by the health endpoint
    pub cache: Arc<dyn CacheStore>,
    /// Database, checked by the health endpoint when present
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state from a service container.
    pub fn from_services(
        services: &dyn ServiceContainer,
        cache: Arc<dyn CacheStore>,
        database: Option<Arc<Database>>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            contact_service: services.contacts(),
            cache,
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        contact_service: Arc<dyn ContactService>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            auth_service,
            contact_service,
            cache,
            database: None,
        }
    }
}
