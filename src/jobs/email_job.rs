//! Email background job.
//!
//! Emails are queued by the services and delivered by the email worker over
//! SMTP. Without `SMTP_HOST` the worker logs the mail instead of sending it.

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::AppError;

const DEFAULT_SMTP_FROM: &str = "noreply@addressbook.local";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Email body content (plain text)
    pub body: String,
}

impl EmailJob {
    /// Create a new email job
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Password reset mail carrying the reset link.
    pub fn password_reset(to: impl Into<String>, reset_link: &str) -> Self {
        Self::new(
            to,
            "Reset your Address Book password",
            format!(
                "A password reset was requested for your account.\n\n\
                 Follow this link to choose a new password:\n{}\n\n\
                 If you did not ask for this, you can ignore this email.",
                reset_link
            ),
        )
    }
}

/// SMTP settings read by the worker.
#[derive(Debug, Clone)]
struct SmtpSettings {
    host: Option<String>,
    port: u16,
    user: Option<String>,
    pass: Option<String>,
    from: String,
    tls: bool,
}

impl SmtpSettings {
    fn from_env() -> Self {
        Self {
            host: env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: env::var("SMTP_USER").ok(),
            pass: env::var("SMTP_PASS").ok(),
            from: env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_SMTP_FROM.to_string()),
            tls: env::var("SMTP_TLS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }

    fn transport(&self, host: &str) -> Result<AsyncSmtpTransport<Tokio1Executor>, AppError> {
        let builder = if self.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| AppError::internal(format!("Invalid SMTP relay {}: {}", host, e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        let mut builder = builder.port(self.port);

        if let (Some(user), Some(pass)) = (&self.user, &self.pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, AppError> {
    address
        .parse()
        .map_err(|e| AppError::internal(format!("Invalid email address {}: {}", address, e)))
}

fn build_message(job: &EmailJob, from: &str) -> Result<Message, AppError> {
    Message::builder()
        .from(parse_mailbox(from)?)
        .to(parse_mailbox(&job.to)?)
        .subject(job.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(job.body.clone())
        .map_err(|e| AppError::internal(format!("Failed to build email: {}", e)))
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    deliver(job, &SmtpSettings::from_env()).await
}

async fn deliver(job: EmailJob, settings: &SmtpSettings) -> Result<(), AppError> {
    tracing::info!(
        to = %job.to,
        from = %settings.from,
        subject = %job.subject,
        "Processing email job"
    );

    let Some(host) = settings.host.as_deref() else {
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            settings.from,
            job.to,
            job.subject,
            job.body
        );
        return Ok(());
    };

    let message = build_message(&job, &settings.from)?;
    let mailer = settings.transport(host)?;

    mailer.send(message).await.map_err(|e| {
        tracing::error!(to = %job.to, host, port = settings.port, error = %e, "SMTP delivery failed");
        AppError::internal(format!("SMTP delivery to {} failed: {}", job.to, e))
    })?;

    tracing::info!(to = %job.to, "Email sent");
    Ok(())
}
