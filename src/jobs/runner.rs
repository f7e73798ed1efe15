//! Owned worker process for the job queues.

use apalis::prelude::*;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::{email_job_handler, notification_job_handler};
use crate::config::{WORKER_NAME_EMAIL, WORKER_NAME_NOTIFICATIONS};
use crate::errors::{AppError, AppResult};
use crate::infra::JobQueue;

/// Runs the email and notification workers on a background task until stopped.
pub struct JobRunner {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<AppResult<()>>,
}

impl JobRunner {
    /// Spawn the worker monitor.
    pub fn start(queue: &JobQueue) -> Self {
        let email_worker = WorkerBuilder::new(WORKER_NAME_EMAIL)
            .backend(queue.email_storage())
            .build_fn(email_job_handler);

        let notification_worker = WorkerBuilder::new(WORKER_NAME_NOTIFICATIONS)
            .backend(queue.notification_storage())
            .build_fn(notification_job_handler);

        let (shutdown, signal) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            Monitor::new()
                .register(email_worker)
                .register(notification_worker)
                .run_with_signal(async move {
                    // A dropped sender stops the workers too
                    let _ = signal.await;
                    Ok(())
                })
                .await
                .map_err(|e| AppError::internal(format!("Worker failed: {}", e)))
        });

        tracing::info!("Job workers started");

        Self {
            shutdown: Some(shutdown),
            handle,
        }
    }

    /// Signal shutdown and wait for in-flight jobs to finish.
    pub async fn stop(mut self) -> AppResult<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let result = self
            .handle
            .await
            .map_err(|e| AppError::internal(format!("Worker task panicked: {}", e)))?;

        tracing::info!("Job workers stopped");
        result
    }
}
