// src/services/mailer.rs
// DOCUMENTATION: Outgoing email
// PURPOSE: OTP delivery over SMTP, with a logging fallback for local development

use crate::config::Config;
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),
    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Anything that can deliver an HTML email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;
}

/// SMTP delivery through lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let from: Mailbox = config
            .mail_from
            .parse()
            .map_err(|e| MailError::Address(format!("{}: {}", config.mail_from, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| MailError::Address(format!("{}: {}", to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        Ok(())
    }
}

/// Writes emails to the log instead of sending them
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        log::info!("[mail] to={} subject={:?}\n{}", to, subject, html);
        Ok(())
    }
}

/// SMTP when configured, otherwise the log
pub fn mailer_from_config(config: &Config) -> Box<dyn Mailer> {
    if config.smtp_host.is_empty() {
        log::warn!("SMTP_HOST not set, emails will be written to the log");
        return Box::new(LogMailer);
    }

    match SmtpMailer::from_config(config) {
        Ok(mailer) => Box::new(mailer),
        Err(e) => {
            log::error!("Invalid SMTP configuration ({}), falling back to log mailer", e);
            Box::new(LogMailer)
        }
    }
}

/// HTML body carrying a one-time code
pub fn otp_email(title: &str, otp: &str, expiry_minutes: i64) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 480px; margin: 0 auto; padding: 24px;">
  <h2 style="color: #1a73e8;">{title}</h2>
  <p>Use the following code to continue:</p>
  <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{otp}</p>
  <p>This code expires in {expiry_minutes} minutes.</p>
  <p style="color: #888; font-size: 12px;">If you did not request this, you can ignore this email.</p>
</div>"#
    )
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records sent mail; optionally fails every send
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String, String)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Smtp("connection refused".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), html.to_string()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingMailer;
    use super::*;

    #[test]
    fn test_otp_email_contains_code() {
        let html = otp_email("Verify your email", "042917", 10);
        assert!(html.contains("042917"));
        assert!(html.contains("10 minutes"));
        assert!(html.contains("Verify your email"));
    }

    #[tokio::test]
    async fn test_log_mailer_without_smtp_host() {
        let config = Config::for_tests();
        assert!(config.smtp_host.is_empty());
        let mailer = mailer_from_config(&config);
        assert!(mailer.send("a@b.co", "Hi", "<p>x</p>").await.is_ok());
    }

    #[tokio::test]
    async fn test_recording_mailer() {
        let mailer = RecordingMailer::default();
        mailer.send("a@b.co", "Hi", "<p>x</p>").await.unwrap();
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);

        let failing = RecordingMailer {
            fail: true,
            ..Default::default()
        };
        assert!(failing.send("a@b.co", "Hi", "x").await.is_err());
    }
}
