use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use snafu::{ResultExt, Snafu};
use tracing::instrument;

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// Leave empty to only log outgoing mail.
    #[serde(rename = "smtp_host", default)]
    pub host: String,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(rename = "smtp_port", default = "default_smtp_port")]
    pub port: u16,
    #[serde(rename = "smtp_username", default)]
    pub username: Option<String>,
    #[serde(rename = "smtp_password", default)]
    pub password: Option<SecretString>,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(rename = "smtp_starttls", default)]
    pub starttls: bool,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(rename = "smtp_from")]
    pub from: Mailbox,
    #[serde(rename = "support_email", default = "default_support_email")]
    pub support_email: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_support_email() -> String {
    "support@tubelab.video".to_string()
}

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MailError {
    #[snafu(display("invalid email address `{address}`: {source}"))]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },

    #[snafu(display("failed to build the email: {source}"))]
    Compose { source: lettre::error::Error },

    #[snafu(display("failed to configure the SMTP relay `{host}`: {source}"))]
    Relay {
        host: String,
        source: lettre::transport::smtp::Error,
    },

    #[snafu(display("failed to send the email: {source}"))]
    Send {
        source: lettre::transport::smtp::Error,
    },
}

#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// Pick the mailer described by the configuration: SMTP, or log-only when no host is set.
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if config.host.trim().is_empty() {
        tracing::warn!("SMTP host not configured, outgoing mail will only be logged");
        return Ok(Arc::new(LogMailer));
    }

    Ok(Arc::new(SmtpMailer::new(config)?))
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        }
        .context(RelaySnafu {
            host: config.host.clone(),
        })?
        .port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) => builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().clone(),
            )),
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from: config.from.clone(),
        })
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, mail), fields(to = %mail.to, subject = %mail.subject))]
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .context(AddressSnafu { address: &mail.to })?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(mail.text)
            .context(ComposeSnafu)?;

        self.transport.send(message).await.context(SendSnafu)?;
        tracing::info!("email sent");
        Ok(())
    }
}

/// Logs mail instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, text = %mail.text, "mail transport disabled, not sending");
        Ok(())
    }
}
