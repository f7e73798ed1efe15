//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::ROLE_USER;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    /// Pending reset token; always set and cleared together with `reset_token_expiry`
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expiry: Option<DateTime<Utc>>,
}

impl User {
    /// Check if a password reset is pending
    pub fn has_pending_reset(&self) -> bool {
        self.reset_token.is_some()
    }

    /// True if `token` is the current reset token and it expires strictly after `now`.
    pub fn reset_token_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        match (&self.reset_token, self.reset_token_expiry) {
            (Some(current), Some(expiry)) => current == token && expiry > now,
            _ => false,
        }
    }

    /// Start (or restart) a password reset.
    pub fn begin_reset(&mut self, token: String, expires_at: DateTime<Utc>) {
        self.reset_token = Some(token);
        self.reset_token_expiry = Some(expires_at);
    }

    /// Replace the password hash and end the pending reset.
    pub fn complete_reset(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.reset_token = None;
        self.reset_token_expiry = None;
    }
}

/// Data needed to insert a user. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl NewUser {
    /// Build a new user, falling back to the default role when none is given.
    pub fn new(name: String, email: String, password_hash: String, role: Option<String>) -> Self {
        let role = role
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| ROLE_USER.to_string());

        Self {
            name,
            email,
            password_hash,
            role,
        }
    }
}

/// Public user profile (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// User display name
    #[schema(example = "Vanshita")]
    pub name: String,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User role
    #[schema(example = "User")]
    pub role: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        User {
            id: 1,
            name: "Vanshita".to_string(),
            email: "v@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: "User".to_string(),
            reset_token: None,
            reset_token_expiry: None,
        }
    }

    #[test]
    fn test_reset_token_valid_requires_match_and_future_expiry() {
        let now = Utc::now();
        let mut user = user();
        assert!(!user.reset_token_valid("abc", now));

        user.begin_reset("abc".to_string(), now + Duration::minutes(5));
        assert!(user.has_pending_reset());
        assert!(user.reset_token_valid("abc", now));
        assert!(!user.reset_token_valid("abd", now));
        assert!(!user.reset_token_valid("abc", now + Duration::minutes(5)));
    }

    #[test]
    fn test_complete_reset_clears_both_fields() {
        let mut user = user();
        user.begin_reset("abc".to_string(), Utc::now());
        user.complete_reset("new-hash".to_string());

        assert_eq!(user.password_hash, "new-hash");
        assert!(user.reset_token.is_none());
        assert!(user.reset_token_expiry.is_none());
    }

    #[test]
    fn test_new_user_defaults_role() {
        let u = NewUser::new("a".into(), "a@b.c".into(), "h".into(), Some("  ".into()));
        assert_eq!(u.role, ROLE_USER);
        let admin = NewUser::new("a".into(), "a@b.c".into(), "h".into(), Some("Admin".into()));
        assert_eq!(admin.role, "Admin");
    }

    #[test]
    fn test_profile_never_carries_hash() {
        let json = serde_json::to_string(&UserProfile::from(user())).unwrap();
        assert!(!json.contains("hash"));
    }
}
