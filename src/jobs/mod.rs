//! Background jobs - queue payloads, their handlers and the worker runner.

mod email_job;
mod notification_job;
mod runner;

pub use email_job::{email_job_handler, EmailJob};
pub use notification_job::{notification_job_handler, NotificationEvent};
pub use runner::JobRunner;
