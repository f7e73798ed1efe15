//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection, migrations and stores (PostgreSQL via SeaORM)
//! - Caching (Redis, or in-process as a fallback)
//! - Repositories built on top of stores and cache
//! - Background job queue (apalis)

pub mod cache;
pub mod db;
pub mod queue;
pub mod repositories;
pub mod store;

pub use cache::{CacheStore, MemoryCache, RedisCache};
pub use db::{Database, Migrator};
pub use queue::{JobQueue, Mailer, Notifier};
pub use repositories::{CachedContactRepository, ContactRepository, UserAccounts, UserRepository};
pub use store::{ContactStore, SqlContactStore, SqlUserStore, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockCacheStore;
#[cfg(any(test, feature = "test-utils"))]
pub use queue::{MockMailer, MockNotifier};
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockContactRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use store::{MockContactStore, MockUserStore};
