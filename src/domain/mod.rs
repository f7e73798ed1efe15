//! Domain layer - Core business entities and logic
//!
//! Contacts, users, password hashing and reset tokens. Nothing in here
//! talks to the database, the cache or the queue.

pub mod contact;
pub mod password;
pub mod reset_token;
pub mod user;

pub use contact::{Contact, NewContact};
pub use password::Password;
pub use reset_token::{generate_reset_token, Clock, SystemClock};
pub use user::{NewUser, User, UserProfile};
