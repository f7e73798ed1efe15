//! Address Book API
//!
//! Contacts behind a cache-aside repository, user accounts with JWT login
//! and a password-reset token flow, and background jobs for email and
//! notifications.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: command-line interface and its commands
//! - **config**: application configuration and constants
//! - **domain**: contacts, users, passwords and reset tokens
//! - **infra**: database, stores, cache, repositories and job queue
//! - **services**: authentication and contact use cases
//! - **jobs**: queue payloads, handlers and the worker runner
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: response envelope
//! - **errors**: centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! address-book-api serve
//!
//! # Run migrations
//! address-book-api migrate up
//!
//! # Run the background workers
//! address-book-api jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Contact, NewContact, User, UserProfile};
pub use errors::{AppError, AppResult};
