//! User accounts: registration and the password-reset token lifecycle.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;

use crate::domain::{generate_reset_token, Clock, NewUser, User, UserProfile};
use crate::errors::{AppError, AppResult};
use crate::infra::store::UserStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user whose email is not taken yet.
    /// Fails with `DuplicateUser` otherwise.
    async fn register(&self, user: NewUser) -> AppResult<UserProfile>;

    /// Full record, hash included, for an exact email match
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Issue a fresh reset token for `email`, replacing any pending one.
    /// Fails with `NotFound` for an unknown email.
    async fn generate_reset_token(&self, email: &str) -> AppResult<String>;

    /// Swap in `password_hash` for the holder of an unexpired `token` and
    /// clear the token. Fails with `InvalidOrExpiredToken` otherwise.
    async fn reset_password(&self, token: &str, password_hash: String) -> AppResult<()>;
}

/// `UserRepository` backed by a `UserStore`.
pub struct UserAccounts {
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    reset_ttl: Duration,
}

impl UserAccounts {
    pub fn new(store: Arc<dyn UserStore>, clock: Arc<dyn Clock>, reset_ttl: Duration) -> Self {
        Self {
            store,
            clock,
            reset_ttl,
        }
    }
}

#[async_trait]
impl UserRepository for UserAccounts {
    async fn register(&self, user: NewUser) -> AppResult<UserProfile> {
        if self.store.find_by_email(&user.email).await?.is_some() {
            tracing::debug!(email = %user.email, "registration rejected, email taken");
            return Err(AppError::DuplicateUser);
        }

        // The unique index still catches a concurrent registration here
        let created = self.store.insert(user).await?;

        tracing::info!(user_id = created.id, "user registered");
        Ok(created.into())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.store.find_by_email(email).await
    }

    async fn generate_reset_token(&self, email: &str) -> AppResult<String> {
        let mut user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound)?;

        let token = generate_reset_token();
        let expires_at = self.clock.now() + self.reset_ttl;
        user.begin_reset(token.clone(), expires_at);

        let user = self.store.update(user).await?;

        tracing::info!(user_id = user.id, %expires_at, "password reset token issued");
        Ok(token)
    }

    async fn reset_password(&self, token: &str, password_hash: String) -> AppResult<()> {
        let now = self.clock.now();
        let mut user = match self.store.find_by_reset_token(token).await? {
            Some(user) if user.reset_token_valid(token, now) => user,
            _ => return Err(AppError::InvalidOrExpiredToken),
        };

        user.complete_reset(password_hash);
        let user = self.store.update(user).await?;

        tracing::info!(user_id = user.id, "password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SystemClock;
    use crate::infra::store::MockUserStore;
    use chrono::{DateTime, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn stored_user() -> User {
        User {
            id: 7,
            name: "Vanshita".to_string(),
            email: "vanshita@example.com".to_string(),
            password_hash: "old-hash".to_string(),
            role: "User".to_string(),
            reset_token: None,
            reset_token_expiry: None,
        }
    }

    fn accounts(store: MockUserStore, clock: Arc<dyn Clock>) -> UserAccounts {
        UserAccounts::new(Arc::new(store), clock, Duration::hours(1))
    }

    fn new_user() -> NewUser {
        NewUser::new(
            "Vanshita".to_string(),
            "vanshita@example.com".to_string(),
            "hash".to_string(),
            None,
        )
    }

    #[tokio::test]
    async fn test_register_existing_email_does_not_insert() {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user())));
        store.expect_insert().never();

        let result = accounts(store, Arc::new(SystemClock)).register(new_user()).await;
        assert!(matches!(result, Err(AppError::DuplicateUser)));
    }

    #[tokio::test]
    async fn test_register_returns_profile() {
        let mut store = MockUserStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store.expect_insert().times(1).returning(|_| Ok(stored_user()));

        let profile = accounts(store, Arc::new(SystemClock))
            .register(new_user())
            .await
            .unwrap();
        assert_eq!(profile.email, "vanshita@example.com");
        assert_eq!(profile.role, "User");
    }

    #[tokio::test]
    async fn test_register_insert_conflict_is_duplicate() {
        let mut store = MockUserStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store
            .expect_insert()
            .returning(|_| Err(AppError::DuplicateUser));

        let result = accounts(store, Arc::new(SystemClock)).register(new_user()).await;
        assert!(matches!(result, Err(AppError::DuplicateUser)));
    }

    #[tokio::test]
    async fn test_generate_reset_token_unknown_email() {
        let mut store = MockUserStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store.expect_update().never();

        let result = accounts(store, Arc::new(SystemClock))
            .generate_reset_token("nobody@example.com")
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_generate_reset_token_sets_expiry_from_clock() {
        let now = Utc::now();
        let mut store = MockUserStore::new();
        store
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user())));
        store
            .expect_update()
            .withf(move |user| {
                user.reset_token.as_ref().is_some_and(|t| t.len() == 43)
                    && user.reset_token_expiry == Some(now + Duration::hours(1))
            })
            .times(1)
            .returning(|user| Ok(user));

        let token = accounts(store, Arc::new(FixedClock(now)))
            .generate_reset_token("vanshita@example.com")
            .await
            .unwrap();
        assert_eq!(token.len(), 43);
    }

    #[tokio::test]
    async fn test_reset_password_expired_token_leaves_user_unchanged() {
        let now = Utc::now();
        let mut store = MockUserStore::new();
        store.expect_find_by_reset_token().returning(move |token| {
            let mut user = stored_user();
            user.begin_reset(token.to_string(), now - Duration::seconds(1));
            Ok(Some(user))
        });
        store.expect_update().never();

        let result = accounts(store, Arc::new(FixedClock(now)))
            .reset_password("token", "new-hash".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidOrExpiredToken)));
    }

    #[tokio::test]
    async fn test_reset_password_expiry_equal_to_now_is_expired() {
        let now = Utc::now();
        let mut store = MockUserStore::new();
        store.expect_find_by_reset_token().returning(move |token| {
            let mut user = stored_user();
            user.begin_reset(token.to_string(), now);
            Ok(Some(user))
        });
        store.expect_update().never();

        let result = accounts(store, Arc::new(FixedClock(now)))
            .reset_password("token", "new-hash".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidOrExpiredToken)));
    }

    #[tokio::test]
    async fn test_reset_password_clears_token_and_replaces_hash() {
        let now = Utc::now();
        let mut store = MockUserStore::new();
        store.expect_find_by_reset_token().returning(move |token| {
            let mut user = stored_user();
            user.begin_reset(token.to_string(), now + Duration::minutes(5));
            Ok(Some(user))
        });
        store
            .expect_update()
            .withf(|user| {
                user.password_hash == "new-hash"
                    && user.reset_token.is_none()
                    && user.reset_token_expiry.is_none()
            })
            .times(1)
            .returning(|user| Ok(user));

        accounts(store, Arc::new(FixedClock(now)))
            .reset_password("token", "new-hash".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_unknown_token() {
        let mut store = MockUserStore::new();
        store.expect_find_by_reset_token().returning(|_| Ok(None));

        let result = accounts(store, Arc::new(SystemClock))
            .reset_password("bogus", "new-hash".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidOrExpiredToken)));
    }
}
