//! Service Container - wires stores, cache and queue into the services.

use std::sync::Arc;

use super::{AuthService, Authenticator, ContactManager, ContactService};
use crate::config::Config;
use crate::domain::Clock;
use crate::infra::{
    CacheStore, CachedContactRepository, ContactStore, Mailer, Notifier, UserAccounts, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get contact service
    fn contacts(&self) -> Arc<dyn ContactService>;
}

/// External collaborators the services are built on.
#[derive(Clone)]
pub struct Backends {
    pub contact_store: Arc<dyn ContactStore>,
    pub user_store: Arc<dyn UserStore>,
    pub cache: Arc<dyn CacheStore>,
    pub notifier: Arc<dyn Notifier>,
    pub mailer: Arc<dyn Mailer>,
    pub clock: Arc<dyn Clock>,
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    contact_service: Arc<dyn ContactService>,
}

impl Services {
    /// Create a container from already built services
    pub fn new(auth_service: Arc<dyn AuthService>, contact_service: Arc<dyn ContactService>) -> Self {
        Self {
            auth_service,
            contact_service,
        }
    }

    /// Build repositories and services on top of the given backends
    pub fn from_backends(backends: Backends, config: &Config) -> Self {
        let contacts = Arc::new(CachedContactRepository::new(
            backends.contact_store,
            backends.cache,
            config.contact_cache_ttl(),
        ));
        let users = Arc::new(UserAccounts::new(
            backends.user_store,
            backends.clock,
            config.reset_token_ttl(),
        ));

        let auth_service = Arc::new(Authenticator::new(
            users,
            backends.notifier.clone(),
            backends.mailer,
            config.clone(),
        ));
        let contact_service = Arc::new(ContactManager::new(contacts, backends.notifier));

        Self::new(auth_service, contact_service)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactService> {
        self.contact_service.clone()
    }
}
