//! SeaORM-backed contact store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, DatabaseConnection, DbErr, EntityTrait,
    QueryOrder, Set,
};

use super::entities::contact::{self, ActiveModel, Entity as ContactEntity};
use super::ContactStore;
use crate::domain::{Contact, NewContact};
use crate::errors::{AppError, AppResult};

/// Contact store over a SeaORM connection
pub struct SqlContactStore {
    db: DatabaseConnection,
}

impl SqlContactStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactStore for SqlContactStore {
    async fn find_all(&self) -> AppResult<Vec<Contact>> {
        let models = ContactEntity::find()
            .order_by_asc(contact::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Contact::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Contact>> {
        let model = ContactEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Contact::from))
    }

    async fn insert(&self, contact: NewContact) -> AppResult<Contact> {
        let active_model = ActiveModel {
            full_name: Set(contact.full_name),
            address: Set(contact.address),
            city: Set(contact.city),
            state: Set(contact.state),
            zip_code: Set(contact.zip_code),
            phone_number: Set(contact.phone_number),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Contact::from(model))
    }

    async fn update(&self, contact: Contact) -> AppResult<Contact> {
        let active_model = ActiveModel {
            id: Unchanged(contact.id),
            full_name: Set(contact.full_name),
            address: Set(contact.address),
            city: Set(contact.city),
            state: Set(contact.state),
            zip_code: Set(contact.zip_code),
            phone_number: Set(contact.phone_number),
        };

        match active_model.update(&self.db).await {
            Ok(model) => Ok(Contact::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = ContactEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
