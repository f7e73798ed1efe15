//! SeaORM-backed user store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::UserStore;
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

/// User store over a SeaORM connection
pub struct SqlUserStore {
    db: DatabaseConnection,
}

impl SqlUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(User::from))
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::ResetToken.eq(token))
            .one(&self.db)
            .await?;

        Ok(model.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set(user.role),
            reset_token: Set(None),
            reset_token_expiry: Set(None),
            ..Default::default()
        };

        // The unique index on email is the authoritative duplicate check
        match active_model.insert(&self.db).await.map_err(AppError::from) {
            Ok(model) => Ok(User::from(model)),
            Err(e) if e.is_unique_violation() => Err(AppError::DuplicateUser),
            Err(e) => Err(e),
        }
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Unchanged(user.id),
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set(user.role),
            reset_token: Set(user.reset_token),
            reset_token_expiry: Set(user.reset_token_expiry),
        };

        match active_model.update(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
