//! Digest delivery over SMTP.
//!
//! The digest goes out as one `multipart/alternative` message (a short
//! plain-text fallback plus the HTML body) addressed to every receiver,
//! over an implicit-TLS SMTP session authenticated as the sender.
//!
//! Delivery failures are not fatal: they are logged and reported as
//! [`DeliveryOutcome::Failed`], and the run still exits successfully. There
//! is no retry.
//!
//! The transport is a type parameter so tests can substitute lettre's
//! `AsyncStubTransport` for a real server.

use crate::config::MailSettings;
use crate::utils::format_day;
use chrono::{Local, NaiveDate};
use lettre::message::{header::ContentType, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt::Display;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Body of the `text/plain` part.
pub const PLAIN_TEXT_FALLBACK: &str =
    "Your daily ArXiv alert. Open in an email client that supports HTML to see full content.";

/// Why a delivery attempt failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("failed to set up SMTP transport: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("failed to send email: {0}")]
    Send(String),
}

/// Result of the single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

/// Subject line for a digest sent on `date`, e.g. `ArXiv Alert - 15 Mar 2024`.
pub fn subject_for(date: NaiveDate) -> String {
    format!("ArXiv Alert - {}", format_day(date))
}

/// Compose the digest email.
pub fn build_message(
    digest: &str,
    mail: &MailSettings,
    date: NaiveDate,
) -> Result<Message, DeliveryError> {
    let mut builder = Message::builder()
        .from(mail.sender.clone())
        .subject(subject_for(date));
    for receiver in &mail.receivers {
        builder = builder.to(receiver.clone());
    }

    let message = builder.multipart(
        MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(PLAIN_TEXT_FALLBACK.to_string()),
            )
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(digest.to_string()),
            ),
    )?;
    Ok(message)
}

/// Implicit-TLS (SMTPS) transport for the configured server.
///
/// The connection is opened on send and closed when the send completes.
pub fn smtp_transport(
    mail: &MailSettings,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
    let creds = Credentials::new(
        mail.sender.email.to_string(),
        mail.sender_password.clone(),
    );
    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&mail.smtp_host)?
        .port(mail.smtp_port)
        .credentials(creds)
        .build();
    Ok(transport)
}

/// Build and send the digest through `transport`, once.
pub async fn deliver<T>(
    transport: &T,
    digest: &str,
    mail: &MailSettings,
    date: NaiveDate,
) -> Result<(), DeliveryError>
where
    T: AsyncTransport + Sync,
    T::Error: Display,
{
    let message = build_message(digest, mail, date)?;
    transport
        .send(message)
        .await
        .map_err(|e| DeliveryError::Send(e.to_string()))?;
    Ok(())
}

/// Send the digest through `transport`, logging instead of propagating
/// any failure.
#[instrument(level = "info", skip_all, fields(receivers = mail.receivers.len()))]
pub async fn send_digest_with<T>(
    transport: &T,
    digest: &str,
    mail: &MailSettings,
    date: NaiveDate,
) -> DeliveryOutcome
where
    T: AsyncTransport + Sync,
    T::Error: Display,
{
    report(deliver(transport, digest, mail, date).await)
}

/// Send the digest to the configured SMTP server, dated today.
#[instrument(level = "info", skip_all, fields(host = %mail.smtp_host, port = mail.smtp_port))]
pub async fn send_digest(digest: &str, mail: &MailSettings) -> DeliveryOutcome {
    let today = Local::now().date_naive();
    match smtp_transport(mail) {
        Ok(transport) => send_digest_with(&transport, digest, mail, today).await,
        Err(e) => report(Err(e)),
    }
}

fn report(result: Result<(), DeliveryError>) -> DeliveryOutcome {
    match result {
        Ok(()) => {
            info!("Email sent successfully");
            DeliveryOutcome::Sent
        }
        Err(e) => {
            error!(error = %e, "Failed to send email");
            DeliveryOutcome::Failed(e.to_string())
        }
    }
}
