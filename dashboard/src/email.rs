use crate::insight::TeamKey;
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

/// Shares a single team card by email over SMTP. Built from SMTP_* env
/// vars; when unconfigured, sends become a logged skip.
pub struct ShareMailer {
    from: String,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl ShareMailer {
    pub fn new(host: &str, port: u16, user: &str, pass: &str, from: &str) -> Self {
        let transport = if !host.is_empty() && !user.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .ok()
                .map(|builder| {
                    builder
                        .port(port)
                        .credentials(Credentials::new(user.to_string(), pass.to_string()))
                        .build()
                })
        } else {
            None
        };

        Self {
            from: from.to_string(),
            transport,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            &env("SMTP_HOST", ""),
            env("SMTP_PORT", "587").parse().unwrap_or(587),
            &env("SMTP_USER", ""),
            &env("SMTP_PASS", ""),
            &env("SHARE_FROM", ""),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some() && !self.from.is_empty()
    }

    /// Send one team's insight text to `to`.
    pub async fn share_insight(&self, to: &str, team: TeamKey, content: &str) -> Result<()> {
        if !self.is_configured() {
            info!("Email not configured, skipping share");
            return Ok(());
        }
        let subject = format!("AI Analytics Insights - {}", team.display_name());
        let body = format!(
            "Here are the AI insights for the {}:\n\n{}\n\nGenerated by AI Analytics Dashboard",
            team.display_name(),
            content,
        );
        self.send_plain_email(to, &subject, &body).await
    }

    async fn send_plain_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let Some(ref transport) = self.transport else {
            return Ok(());
        };

        let email = Message::builder()
            .from(self.from.parse().context("Parse from address")?)
            .to(to.parse().context("Parse to address")?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Build email")?;

        match transport.send(email).await {
            Ok(_) => {
                info!("Email sent: {subject}");
                Ok(())
            }
            Err(e) => {
                error!("Email send failed: {e}");
                Err(anyhow::anyhow!("Email failed: {e}"))
            }
        }
    }
}

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_env_is_unconfigured() {
        let mailer = ShareMailer::new("", 587, "", "", "");
        assert!(!mailer.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_share_is_a_silent_skip() {
        let mailer = ShareMailer::new("", 587, "", "", "");
        let sent = mailer
            .share_insight("someone@example.com", TeamKey::Product, "hello")
            .await;
        assert!(sent.is_ok());
    }
}
