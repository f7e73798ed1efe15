//! Background job queue.
//!
//! `Notifier` and `Mailer` are the publishing seams the services use.
//! `JobQueue` implements both on apalis PostgreSQL storage, one namespace
//! per queue.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::{PgPool, PgPoolOptions};
use apalis_sql::Config as StorageConfig;
use async_trait::async_trait;

use crate::config::{JOB_POOL_MAX_CONNECTIONS, QUEUE_EMAILS, QUEUE_NOTIFICATIONS};
use crate::errors::{AppError, AppResult};
use crate::jobs::{EmailJob, NotificationEvent};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fire-and-forget event publisher.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish an event. Failures are logged, never returned.
    async fn publish(&self, event: NotificationEvent);
}

/// Outgoing mail.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Queue an email for delivery by the email worker.
    async fn send(&self, email: EmailJob) -> AppResult<()>;
}

/// apalis storage for the email and notification queues.
#[derive(Clone)]
pub struct JobQueue {
    pool: PgPool,
    emails: PostgresStorage<EmailJob>,
    notifications: PostgresStorage<NotificationEvent>,
}

impl JobQueue {
    /// Open a pool for the job tables and make sure they exist.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(JOB_POOL_MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| AppError::internal(format!("Failed to connect job queue: {}", e)))?;

        PostgresStorage::setup(&pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

        tracing::info!("Job queue connected");
        Ok(Self::from_pool(pool))
    }

    /// Wrap a pool whose job tables are already set up.
    pub fn from_pool(pool: PgPool) -> Self {
        let emails =
            PostgresStorage::new_with_config(pool.clone(), StorageConfig::new(QUEUE_EMAILS));
        let notifications = PostgresStorage::new_with_config(
            pool.clone(),
            StorageConfig::new(QUEUE_NOTIFICATIONS),
        );

        Self {
            pool,
            emails,
            notifications,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn email_storage(&self) -> PostgresStorage<EmailJob> {
        self.emails.clone()
    }

    pub fn notification_storage(&self) -> PostgresStorage<NotificationEvent> {
        self.notifications.clone()
    }
}

#[async_trait]
impl Notifier for JobQueue {
    async fn publish(&self, event: NotificationEvent) {
        let kind = event.kind();
        // push needs &mut; storages are cheap handles over the shared pool
        let mut storage = self.notifications.clone();

        match storage.push(event).await {
            Ok(_) => tracing::debug!(kind, "notification published"),
            Err(e) => tracing::warn!(kind, error = %e, "failed to publish notification"),
        }
    }
}

#[async_trait]
impl Mailer for JobQueue {
    async fn send(&self, email: EmailJob) -> AppResult<()> {
        let mut storage = self.emails.clone();

        storage
            .push(email)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email: {}", e)))?;

        tracing::debug!("email queued");
        Ok(())
    }
}
