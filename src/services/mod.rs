//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod container;
mod contact_service;

// Service Container
pub use container::{Backends, ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, LoginResponse};
pub use contact_service::{ContactManager, ContactService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
