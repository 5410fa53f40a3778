//! Telegram Bot API HTTP client.
//!
//! Every method is a JSON `POST` to `{api_base}/bot{token}/{method}`. The
//! token is part of the URL, so transport errors are scrubbed before they
//! reach a log line.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{OutgoingMessage, TelegramConfig};
use crate::domain::ports::Messenger;
use crate::infrastructure::logging::scrub;

const SERVICE: &str = "telegram";

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CopyMessageRequest {
    chat_id: i64,
    from_chat_id: i64,
    message_id: i64,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    chat_id: i64,
}

#[derive(Debug, Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_token: Option<&'a str>,
    allowed_updates: [&'a str; 1],
}

/// HTTP client for the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    bot_token: String,
    api_base: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            http: Client::new(),
            bot_token: config.bot_token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Register `url` as the webhook, with the secret Telegram echoes back
    /// in `X-Telegram-Bot-Api-Secret-Token`.
    pub async fn set_webhook(&self, url: &str, secret_token: &str) -> DomainResult<()> {
        self.call(
            "setWebhook",
            &SetWebhookRequest {
                url,
                secret_token: (!secret_token.is_empty()).then_some(secret_token),
                allowed_updates: ["message"],
            },
        )
        .await
    }

    async fn call<T: Serialize + Sync>(&self, method: &str, payload: &T) -> DomainResult<()> {
        let url = format!("{}/bot{}/{method}", self.api_base, self.bot_token);

        let resp = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                DomainError::upstream(SERVICE, scrub(&format!("{method} request failed: {e}")))
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            DomainError::upstream(
                SERVICE,
                scrub(&format!("{method} returned {status} with unreadable body: {e}")),
            )
        })?;
        if !status.is_success() {
            return Err(DomainError::upstream(
                SERVICE,
                scrub(&format!("{method} returned {status}: {body}")),
            ));
        }

        let parsed: ApiResponse = serde_json::from_str(&body).map_err(|e| {
            DomainError::upstream(SERVICE, format!("{method} parse failed: {e}"))
        })?;
        if !parsed.ok {
            return Err(DomainError::upstream(
                SERVICE,
                format!(
                    "{method} rejected: {}",
                    parsed.description.unwrap_or_default()
                ),
            ));
        }

        tracing::debug!(method, "telegram call succeeded");
        Ok(())
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, message: &OutgoingMessage) -> DomainResult<()> {
        self.call("sendMessage", message).await
    }

    async fn copy_message(
        &self,
        to_chat: i64,
        from_chat: i64,
        message_id: i64,
    ) -> DomainResult<()> {
        self.call(
            "copyMessage",
            &CopyMessageRequest {
                chat_id: to_chat,
                from_chat_id: from_chat,
                message_id,
            },
        )
        .await
    }

    async fn leave_chat(&self, chat_id: i64) -> DomainResult<()> {
        self.call("leaveChat", &ChatRequest { chat_id }).await
    }
}
