//! Durable storage for contacts and users.
//!
//! The store traits are the persistence capability the repositories are
//! built on (query/insert/update/delete). The SeaORM implementations talk to
//! PostgreSQL; tests substitute in-memory ones.

mod contact_store;
pub(crate) mod entities;
mod user_store;

use async_trait::async_trait;

use crate::domain::{Contact, NewContact, NewUser, User};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use contact_store::SqlContactStore;
pub use user_store::SqlUserStore;

/// Contact persistence.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts ordered by id
    async fn find_all(&self) -> AppResult<Vec<Contact>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Contact>>;

    /// Insert and return the record with its assigned id
    async fn insert(&self, contact: NewContact) -> AppResult<Contact>;

    /// Persist every field of an existing record.
    /// Fails with `NotFound` if the id no longer exists.
    async fn update(&self, contact: Contact) -> AppResult<Contact>;

    /// Remove by id; `false` if nothing was removed
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// User persistence.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact-match lookup by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Lookup by the current reset token value
    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>>;

    /// Insert a user. A duplicate email fails with `DuplicateUser`.
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Persist every field of an existing user.
    async fn update(&self, user: User) -> AppResult<User>;
}
