//! Email subscription handling
//!
//! Validation can fail the request; mail delivery is best-effort and never
//! does.

use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

use crate::config::EmailConfig;
use crate::errors::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
    pub match_count: usize,
}

pub struct SubscriptionService {
    client: Client,
    config: EmailConfig,
}

impl SubscriptionService {
    pub fn new(config: EmailConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }

    /// Validate the address, send the welcome email best-effort, and build
    /// the confirmation message
    pub async fn subscribe(&self, email: &str, match_count: usize) -> ApiResult<SubscribeResponse> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(ApiError::bad_request("Please provide a valid email address"));
        }

        if self.config.api_key.is_some() {
            if let Err(e) = self.send_welcome_email(email, match_count).await {
                tracing::warn!("welcome email to {} failed: {}", email, e);
            }
        } else {
            tracing::debug!("no mail API key configured, skipping welcome email");
        }

        let message = match match_count {
            0 => "You're on the list! No matches today — we'll be in touch on matchday.".to_string(),
            1 => "You're on the list! There is 1 match today.".to_string(),
            n => format!("You're on the list! There are {n} matches today."),
        };

        Ok(SubscribeResponse {
            success: true,
            message,
            match_count,
        })
    }

    async fn send_welcome_email(&self, email: &str, match_count: usize) -> anyhow::Result<()> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("mail API key missing"))?;

        let body = json!({
            "sender": {
                "name": self.config.sender_name,
                "email": self.config.sender_email,
            },
            "to": [{ "email": email }],
            "subject": "Welcome to La Liga Hub ⚽",
            "htmlContent": welcome_html(match_count),
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", api_key)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("mail provider answered {}", status);
        }

        tracing::info!("welcome email sent to {}", email);
        Ok(())
    }
}

fn welcome_html(match_count: usize) -> String {
    let today_line = match match_count {
        0 => "No matches scheduled today — enjoy the break.".to_string(),
        1 => "1 match kicks off today.".to_string(),
        n => format!("{n} matches kick off today."),
    };
    format!(
        "<h2>Welcome to La Liga Hub!</h2>\
         <p>You are subscribed to matchday alerts.</p>\
         <p>{today_line}</p>"
    )
}
