use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::portfolio::BalanceReport;

pub mod command;

pub const ENDPOINT: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Bot API client.
#[derive(Debug, Clone)]
pub struct Telegram {
    client: Client,
    endpoint: String,
    token: String,
}

impl Telegram {
    pub fn new(token: String) -> Result<Self> {
        Self::with_endpoint(ENDPOINT, token)
    }

    pub fn with_endpoint(endpoint: &str, token: String) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Uses the given token, falling back to `TELEGRAM_BOT_TOKEN`.
    pub fn resolve_token(token: Option<String>) -> Result<String> {
        match token {
            Some(token) => Ok(token),
            None => env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN is not set"),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let url = format!("{}/bot{}/{}", self.endpoint, self.token, method);

        let mut request = self.client.post(&url).json(&params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let res = request.send().await?;

        let response: ApiResponse<T> = res.json().await?;
        if !response.ok {
            bail!(
                "Telegram {} failed : {}",
                method,
                response.description.unwrap_or_default()
            );
        }
        response
            .result
            .with_context(|| format!("Telegram {} returned no result", method))
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let params = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });
        let _: serde_json::Value = self.call("sendMessage", params, None).await?;
        debug!("Message sent to {}", chat_id);
        Ok(())
    }

    /// Long polls for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>> {
        let params = serde_json::json!({
            "offset": offset,
            "timeout": timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        self.call("getUpdates", params, Some(timeout + Duration::from_secs(5)))
            .await
    }
}

/// Renders a report as a fixed-width HTML block.
pub fn format_report(report: &BalanceReport) -> String {
    format!("<pre>{} 🤑</pre>", report)
}

/// Escapes text for messages sent in HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
