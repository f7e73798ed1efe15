//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use address_book_api::config::Config;
use address_book_api::domain::{Clock, Contact, NewContact, NewUser, User};
use address_book_api::errors::{AppError, AppResult};
use address_book_api::infra::{CacheStore, ContactStore, Mailer, MemoryCache, Notifier, UserStore};
use address_book_api::jobs::{EmailJob, NotificationEvent};
use address_book_api::services::{Backends, Services};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Contact store keeping rows in a map, counting reads.
#[derive(Default)]
pub struct InMemoryContactStore {
    rows: Mutex<BTreeMap<i32, Contact>>,
    next_id: AtomicUsize,
    reads: AtomicUsize,
}

impl InMemoryContactStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn find_all(&self) -> AppResult<Vec<Contact>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Contact>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, contact: NewContact) -> AppResult<Contact> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        let contact = contact.with_id(id);
        self.rows.lock().unwrap().insert(id, contact.clone());
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> AppResult<Contact> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&contact.id) {
            Some(row) => {
                *row = contact.clone();
                Ok(contact)
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

/// User store with the same uniqueness rules as the database.
#[derive(Default)]
pub struct InMemoryUserStore {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn find(&self, email: &str) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find(email))
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateUser);
        }

        let user = User {
            id: rows.len() as i32 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            reset_token: None,
            reset_token_expiry: None,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AppError::NotFound)?;
        *row = user.clone();
        Ok(user)
    }
}

/// Cache whose every call fails.
pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::internal("cache unavailable"))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> AppResult<()> {
        Err(AppError::internal("cache unavailable"))
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::internal("cache unavailable"))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::internal("cache unavailable"))
    }
}

/// Notifier remembering what was published.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<NotificationEvent>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, event: NotificationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Mailer remembering what was sent.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailJob>>,
}

impl RecordingMailer {
    /// Token from the last reset link sent.
    pub fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().and_then(|mail| {
            mail.body
                .split("?token=")
                .nth(1)
                .map(|rest| rest.split_whitespace().next().unwrap_or("").to_string())
        })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: EmailJob) -> AppResult<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Clock that only moves when told to.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Mutex::new(Utc::now()))
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Everything a test may want to inspect after exercising the services.
pub struct Harness {
    pub services: Services,
    pub contacts: Arc<InMemoryContactStore>,
    pub users: Arc<InMemoryUserStore>,
    pub cache: Arc<dyn CacheStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MemoryCache::new()))
    }

    pub fn with_cache(cache: Arc<dyn CacheStore>) -> Self {
        let contacts = Arc::new(InMemoryContactStore::default());
        let users = Arc::new(InMemoryUserStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let mailer = Arc::new(RecordingMailer::default());
        let clock = Arc::new(ManualClock::new());

        let services = Services::from_backends(
            Backends {
                contact_store: contacts.clone(),
                user_store: users.clone(),
                cache: cache.clone(),
                notifier: notifier.clone(),
                mailer: mailer.clone(),
                clock: clock.clone(),
            },
            &Config::with_secret(TEST_SECRET),
        );

        Self {
            services,
            contacts,
            users,
            cache,
            notifier,
            mailer,
            clock,
        }
    }
}

pub fn rekha() -> NewContact {
    NewContact {
        full_name: "Rekha Khantal".to_string(),
        phone_number: "2843184672".to_string(),
        ..Default::default()
    }
}
