//! Contact service - address book use cases.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Contact, NewContact};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{ContactRepository, Notifier};
use crate::jobs::NotificationEvent;

/// Contact service trait for dependency injection.
#[async_trait]
pub trait ContactService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Contact>>;

    /// Fetch one contact; `NotFound` if absent
    async fn get(&self, id: i32) -> AppResult<Contact>;

    /// Add a contact and announce it on the notifications queue
    async fn add(&self, contact: NewContact) -> AppResult<Contact>;

    async fn update(&self, id: i32, contact: NewContact) -> AppResult<()>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ContactService.
pub struct ContactManager {
    contacts: Arc<dyn ContactRepository>,
    notifier: Arc<dyn Notifier>,
}

impl ContactManager {
    pub fn new(contacts: Arc<dyn ContactRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { contacts, notifier }
    }
}

#[async_trait]
impl ContactService for ContactManager {
    async fn list(&self) -> AppResult<Vec<Contact>> {
        self.contacts.get_all().await
    }

    async fn get(&self, id: i32) -> AppResult<Contact> {
        self.contacts.get_by_id(id).await?.ok_or_not_found()
    }

    async fn add(&self, contact: NewContact) -> AppResult<Contact> {
        let created = self.contacts.add(contact).await?;

        self.notifier
            .publish(NotificationEvent::ContactAdded {
                contact_id: created.id,
                full_name: created.full_name.clone(),
                phone_number: created.phone_number.clone(),
            })
            .await;

        Ok(created)
    }

    async fn update(&self, id: i32, contact: NewContact) -> AppResult<()> {
        self.contacts.update(id, contact).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.contacts.delete(id).await
    }
}
