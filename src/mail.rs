use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::SmtpConfig;

/// Outbound OTP delivery. The concrete transport is swappable behind this
/// seam; failures surface to the caller, nothing is retried.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

/// Sends through an external SMTP relay over STARTTLS. A fresh relay
/// session is opened per call.
pub struct SmtpMailer {
    config: SmtpConfig,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .context("parse SMTP_FROM address")?;
        Ok(Self {
            config: config.clone(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let to_mailbox = to.parse::<Mailbox>().context("parse recipient address")?;

        let body = format!(
            "Hello,\n\n\
             Your OTP for account registration is: {code}\n\n\
             This OTP is valid for 5 minutes.\n\n\
             If you didn't request this OTP, please ignore this email.\n\n\
             Best regards,\n\
             Team"
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject("Your OTP for Account Registration")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .context("build message")?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .context("open relay")?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport.send(message).await.context("submit to relay")?;
        info!(to = %to, "otp email submitted");
        Ok(())
    }
}
