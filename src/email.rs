//! OTP email delivery.
//!
//! The signup flow treats delivery as fire-and-forget: the message is handed
//! to an [`EmailSender`] and failures are logged, never surfaced to the user.
//! The real sender posts to the EmailJS REST API (the provider the product
//! uses); local dev falls back to a logging stub.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::config::EmailConfig;

const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Clone)]
pub struct OtpEmail {
    pub name: String,
    pub email: String,
    pub otp: u32,
}

/// Email delivery abstraction.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver the OTP message or return an error.
    async fn send_otp(&self, message: &OtpEmail) -> anyhow::Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_otp(&self, message: &OtpEmail) -> anyhow::Result<()> {
        info!(
            to_email = %message.email,
            otp = message.otp,
            "email send stub"
        );
        Ok(())
    }
}

/// Sender backed by the EmailJS transactional API.
#[derive(Clone)]
pub struct EmailJsSender {
    http: reqwest::Client,
    config: EmailConfig,
}

impl EmailJsSender {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn payload(&self, message: &OtpEmail) -> serde_json::Value {
        json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key,
            "template_params": {
                "name": message.name,
                "email": message.email,
                "otp": message.otp,
            },
        })
    }
}

#[async_trait]
impl EmailSender for EmailJsSender {
    async fn send_otp(&self, message: &OtpEmail) -> anyhow::Result<()> {
        let response = self
            .http
            .post(EMAILJS_ENDPOINT)
            .json(&self.payload(message))
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("email provider returned {}", response.status());
        }
        Ok(())
    }
}

/// Pick the sender for the current deployment.
pub fn sender_from_config(config: Option<EmailConfig>) -> std::sync::Arc<dyn EmailSender> {
    match config {
        Some(config) => std::sync::Arc::new(EmailJsSender::new(config)),
        None => std::sync::Arc::new(LogEmailSender),
    }
}
