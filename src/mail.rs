use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::config::MailConfig;

/// Which flow an OTP email belongs to; selects subject and visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    Verify,
    Reset,
}

/// A fully rendered outbound message: plain-text fallback plus styled HTML.
#[derive(Debug, Clone)]
pub struct OtpEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub fn build_otp_email(kind: MailKind, otp: &str, resend: bool) -> OtpEmail {
    // Green for registration, red for reset.
    let (color, bg_color) = match kind {
        MailKind::Verify => ("#10B981", "#f0fdf4"),
        MailKind::Reset => ("#EF4444", "#fef2f2"),
    };
    let (title, desc) = match kind {
        MailKind::Verify => (
            "Verify Your Email Address",
            "Use the code below to complete your registration with LMS.",
        ),
        MailKind::Reset => (
            "Reset Your Password",
            "Use the code below to reset your LMS password.",
        ),
    };
    let base_subject = match kind {
        MailKind::Verify => "Verify your email - LMS",
        MailKind::Reset => "Reset Password - LMS",
    };
    let subject = if resend {
        format!("Resend: {}", base_subject)
    } else {
        base_subject.to_string()
    };

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #e0e0e0; border-radius: 10px;">
  <h2 style="color: #333; text-align: center;">{title}</h2>
  <p style="font-size: 16px; color: #555; text-align: center;">{desc}</p>
  <div style="margin: 30px 0; text-align: center;">
    <h1 style="color: {color}; font-size: 40px; letter-spacing: 5px; margin: 0; padding: 10px; background-color: {bg_color}; display: inline-block; border-radius: 8px; border: 1px dashed {color};">{otp}</h1>
  </div>
  <p style="font-size: 14px; color: #999; text-align: center;">This code is valid for 10 minutes. If you didn't request this, please ignore this email.</p>
  <div style="text-align: center; margin-top: 20px;">
    <small style="color: #aaa;">LMS System</small>
  </div>
</div>"#
    );
    let text = format!("Your verification code is: {otp}. Valid for 10 minutes.");

    OtpEmail { subject, text, html }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, email: &OtpEmail) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

/// Delivers through a transactional-email HTTP API.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, email: &OtpEmail) -> anyhow::Result<()> {
        let body = SendEmailBody {
            sender: Address {
                email: &self.config.sender_email,
                name: Some(&self.config.sender_name),
            },
            to: vec![Address { email: to, name: None }],
            subject: &email.subject,
            html_content: &email.html,
            text_content: &email.text,
        };

        let res = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("send email request")?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            anyhow::bail!("mail provider returned {}: {}", status, detail);
        }
        Ok(())
    }
}

/// Local dev sender that logs the message instead of delivering it.
#[derive(Clone, Debug)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, email: &OtpEmail) -> anyhow::Result<()> {
        info!(to = %to, subject = %email.subject, body = %email.text, "email send stub");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_appears_in_both_bodies() {
        let mail = build_otp_email(MailKind::Verify, "aB3xY9", false);
        assert!(mail.html.contains("aB3xY9"));
        assert!(mail.text.contains("aB3xY9"));
    }

    #[test]
    fn themes_differ_by_flow() {
        let verify = build_otp_email(MailKind::Verify, "000000", false);
        let reset = build_otp_email(MailKind::Reset, "000000", false);
        assert!(verify.html.contains("#10B981"));
        assert!(reset.html.contains("#EF4444"));
        assert!(verify.html.contains("complete your registration"));
        assert!(reset.html.contains("reset your LMS password"));
    }

    #[test]
    fn resend_prefixes_the_subject() {
        let first = build_otp_email(MailKind::Reset, "000000", false);
        let again = build_otp_email(MailKind::Reset, "000000", true);
        assert_eq!(first.subject, "Reset Password - LMS");
        assert_eq!(again.subject, "Resend: Reset Password - LMS");
    }

    #[test]
    fn provider_payload_uses_camel_case() {
        let body = SendEmailBody {
            sender: Address {
                email: "no-reply@lms.local",
                name: Some("LMS System"),
            },
            to: vec![Address {
                email: "test@example.com",
                name: None,
            }],
            subject: "s",
            html_content: "<p>h</p>",
            text_content: "t",
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("htmlContent"));
        assert!(json.contains("textContent"));
        assert!(!json.contains("\"name\":null"));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mail = build_otp_email(MailKind::Verify, "123abc", false);
        LogMailer.send("test@example.com", &mail).await.unwrap();
    }
}
