//! Authentication service - registration, login and password reset.
//!
//! Hashing goes through the domain `Password` value object; persistence and
//! the reset-token lifecycle through `UserRepository`.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User, UserProfile};
use crate::errors::{AppError, AppResult};
use crate::infra::{Mailer, Notifier, UserRepository};
use crate::jobs::{EmailJob, NotificationEvent};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Returned by a successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed JWT
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: Option<String>,
    ) -> AppResult<UserProfile>;

    /// Check credentials and issue a JWT
    async fn login_user(&self, email: String, password: String) -> AppResult<LoginResponse>;

    /// Issue a reset token and email the reset link to the user
    async fn forgot_password(&self, email: String) -> AppResult<()>;

    /// Set a new password using a reset token
    async fn reset_password(&self, token: String, new_password: String) -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<LoginResponse> {
    let now = Utc::now();
    let expires_at = config
        .jwt_expiration()
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AppError::internal("JWT expiration is out of range"))?;

    let claims = Claims {
        sub: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(LoginResponse {
        token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: user.into(),
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
    mailer: Arc<dyn Mailer>,
    config: Config,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
        mailer: Arc<dyn Mailer>,
        config: Config,
    ) -> Self {
        Self {
            users,
            notifier,
            mailer,
            config,
        }
    }

    fn reset_link(&self, token: &str) -> String {
        format!("{}?token={}", self.config.reset_password_url, token)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: Option<String>,
    ) -> AppResult<UserProfile> {
        let password_hash = Password::new(&password)?.into_string();
        let profile = self
            .users
            .register(NewUser::new(name, email, password_hash, role))
            .await?;

        self.notifier
            .publish(NotificationEvent::UserRegistered {
                name: profile.name.clone(),
                email: profile.email.clone(),
            })
            .await;

        Ok(profile)
    }

    async fn login_user(&self, email: String, password: String) -> AppResult<LoginResponse> {
        let user = self.users.get_by_email(&email).await?;

        // Verify against a dummy hash for unknown emails so both paths take the same time
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => {
                tracing::info!(user_id = user.id, "user logged in");
                generate_token(&user, &self.config)
            }
            _ => {
                tracing::debug!("login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn forgot_password(&self, email: String) -> AppResult<()> {
        let token = self.users.generate_reset_token(&email).await?;

        self.mailer
            .send(EmailJob::password_reset(&email, &self.reset_link(&token)))
            .await
    }

    async fn reset_password(&self, token: String, new_password: String) -> AppResult<()> {
        let password_hash = Password::new(&new_password)?.into_string();
        self.users.reset_password(&token, password_hash).await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockMailer, MockNotifier, MockUserRepository};

    const SECRET: &str = "unit-test-secret-that-is-at-least-32-chars";

    fn stored_user(password: &str) -> User {
        User {
            id: 11,
            name: "Vanshita".to_string(),
            email: "vanshita@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: "Admin".to_string(),
            reset_token: None,
            reset_token_expiry: None,
        }
    }

    fn service(users: MockUserRepository, notifier: MockNotifier, mailer: MockMailer) -> Authenticator {
        Authenticator::new(
            Arc::new(users),
            Arc::new(notifier),
            Arc::new(mailer),
            Config::with_secret(SECRET),
        )
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_publishes() {
        let mut users = MockUserRepository::new();
        users
            .expect_register()
            .withf(|user| user.password_hash.starts_with("$argon2") && user.role == "User")
            .times(1)
            .returning(|user| {
                Ok(UserProfile {
                    name: user.name,
                    email: user.email,
                    role: user.role,
                })
            });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_publish()
            .withf(|event| matches!(event, NotificationEvent::UserRegistered { email, .. } if email == "v@example.com"))
            .times(1)
            .returning(|_| ());

        let profile = service(users, notifier, MockMailer::new())
            .register_user(
                "V".to_string(),
                "v@example.com".to_string(),
                "Vanshita@123".to_string(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(profile.role, "User");
    }

    #[tokio::test]
    async fn test_register_duplicate_does_not_publish() {
        let mut users = MockUserRepository::new();
        users
            .expect_register()
            .returning(|_| Err(AppError::DuplicateUser));

        let mut notifier = MockNotifier::new();
        notifier.expect_publish().never();

        let result = service(users, notifier, MockMailer::new())
            .register_user(
                "V".to_string(),
                "v@example.com".to_string(),
                "Vanshita@123".to_string(),
                None,
            )
            .await;
        assert!(matches!(result, Err(AppError::DuplicateUser)));
    }

    #[tokio::test]
    async fn test_register_short_password_is_validation_error() {
        let mut users = MockUserRepository::new();
        users.expect_register().never();

        let result = service(users, MockNotifier::new(), MockMailer::new())
            .register_user("V".into(), "v@example.com".into(), "short".into(), None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_get_by_email()
            .returning(|_| Ok(Some(stored_user("Vanshita@123"))));

        let auth = service(users, MockNotifier::new(), MockMailer::new());
        let response = auth
            .login_user("vanshita@example.com".into(), "Vanshita@123".into())
            .await
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.user.email, "vanshita@example.com");

        let claims = auth.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, 11);
        assert_eq!(claims.email, "vanshita@example.com");
        assert_eq!(claims.role, "Admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_login_with_overflowing_expiry_is_internal_error() {
        let mut users = MockUserRepository::new();
        users
            .expect_get_by_email()
            .returning(|_| Ok(Some(stored_user("Vanshita@123"))));

        let mut config = Config::with_secret(SECRET);
        config.jwt_expiration_hours = i64::MAX;
        let auth = Authenticator::new(
            Arc::new(users),
            Arc::new(MockNotifier::new()),
            Arc::new(MockMailer::new()),
            config,
        );

        let result = auth
            .login_user("vanshita@example.com".into(), "Vanshita@123".into())
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_email().returning(|email| {
            if email == "vanshita@example.com" {
                Ok(Some(stored_user("Vanshita@123")))
            } else {
                Ok(None)
            }
        });

        let auth = service(users, MockNotifier::new(), MockMailer::new());
        let wrong_password = auth
            .login_user("vanshita@example.com".into(), "WrongPass1".into())
            .await
            .unwrap_err();
        let unknown_email = auth
            .login_user("ghost@example.com".into(), "Vanshita@123".into())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.user_message(), unknown_email.user_message());
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let mut users = MockUserRepository::new();
        users
            .expect_get_by_email()
            .returning(|_| Ok(Some(stored_user("Vanshita@123"))));

        let issuer = service(users, MockNotifier::new(), MockMailer::new());
        let token = issuer
            .login_user("vanshita@example.com".into(), "Vanshita@123".into())
            .await
            .unwrap()
            .token;

        let other = Authenticator::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockNotifier::new()),
            Arc::new(MockMailer::new()),
            Config::with_secret("a-completely-different-secret-of-32+chars"),
        );
        assert!(matches!(other.verify_token(&token), Err(AppError::Jwt(_))));
    }

    #[tokio::test]
    async fn test_forgot_password_mails_reset_link() {
        let mut users = MockUserRepository::new();
        users
            .expect_generate_reset_token()
            .returning(|_| Ok("tok123".to_string()));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|mail| mail.to == "vanshita@example.com" && mail.body.contains("?token=tok123"))
            .times(1)
            .returning(|_| Ok(()));

        service(users, MockNotifier::new(), mailer)
            .forgot_password("vanshita@example.com".into())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email_sends_nothing() {
        let mut users = MockUserRepository::new();
        users
            .expect_generate_reset_token()
            .returning(|_| Err(AppError::NotFound));

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let result = service(users, MockNotifier::new(), mailer)
            .forgot_password("ghost@example.com".into())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_reset_password_passes_hash_to_repository() {
        let mut users = MockUserRepository::new();
        users
            .expect_reset_password()
            .withf(|token, hash| token == "tok" && Password::from_hash(hash.clone()).verify("NewPass@123"))
            .times(1)
            .returning(|_, _| Ok(()));

        service(users, MockNotifier::new(), MockMailer::new())
            .reset_password("tok".into(), "NewPass@123".into())
            .await
            .unwrap();
    }
}
