//! Repository layer - Data access abstraction
//!
//! Repositories hold the rules that sit between the services and the raw
//! stores: cache-aside for contacts, uniqueness and reset tokens for users.

mod contact_repository;
mod user_repository;

pub use contact_repository::{CachedContactRepository, ContactRepository};
pub use user_repository::{UserAccounts, UserRepository};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use contact_repository::MockContactRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
