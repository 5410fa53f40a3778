//! Trello REST client.
//!
//! Authenticates with the `key` and `token` query parameters on every call
//! and maps HTTP / network errors to [`DomainError::Upstream`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::TrelloConfig;
use crate::domain::ports::TicketTracker;
use crate::infrastructure::logging::scrub;

use super::models::{CardUpdateRequest, CommentRequest, TrelloCard};

const SERVICE: &str = "trello";

/// HTTP client for the Trello REST API v1.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    http: Client,
    key: String,
    token: String,
    api_base: String,
}

impl TrelloClient {
    pub fn new(config: &TrelloConfig) -> Self {
        Self {
            http: Client::new(),
            key: config.key.clone(),
            token: config.token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/1/{path}", self.api_base))
            .query(&[("key", self.key.as_str()), ("token", self.token.as_str())])
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, op: &str) -> DomainResult<T> {
        let resp = req.send().await.map_err(|e| {
            DomainError::upstream(SERVICE, scrub(&format!("{op} request failed: {e}")))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.map_err(|e| {
                DomainError::upstream(
                    SERVICE,
                    scrub(&format!("{op} returned {status} with unreadable body: {e}")),
                )
            })?;
            return Err(DomainError::upstream(
                SERVICE,
                scrub(&format!("{op} returned {status}: {body}")),
            ));
        }

        resp.json::<T>()
            .await
            .map_err(|e| DomainError::upstream(SERVICE, scrub(&format!("{op} parse failed: {e}"))))
    }

    /// Fetch a card with its description.
    pub async fn get_card(&self, card_id: &str) -> DomainResult<TrelloCard> {
        let req = self
            .request(Method::GET, &format!("cards/{card_id}"))
            .query(&[("fields", "desc")]);
        self.send(req, "get_card").await
    }

    /// Replace the description of a card.
    pub async fn update_description(&self, card_id: &str, desc: &str) -> DomainResult<()> {
        let req = self
            .request(Method::PUT, &format!("cards/{card_id}"))
            .json(&CardUpdateRequest { desc });
        self.send::<serde_json::Value>(req, "update_card").await?;
        Ok(())
    }

    /// Post a comment on a card.
    pub async fn post_comment(&self, card_id: &str, text: &str) -> DomainResult<()> {
        let req = self
            .request(Method::POST, &format!("cards/{card_id}/actions/comments"))
            .json(&CommentRequest { text });
        self.send::<serde_json::Value>(req, "add_comment").await?;
        Ok(())
    }
}

#[async_trait]
impl TicketTracker for TrelloClient {
    async fn description(&self, ticket_id: &str) -> DomainResult<String> {
        Ok(self.get_card(ticket_id).await?.desc)
    }

    async fn set_description(&self, ticket_id: &str, description: &str) -> DomainResult<()> {
        tracing::debug!(ticket_id, "updating card description");
        self.update_description(ticket_id, description).await
    }

    async fn add_comment(&self, ticket_id: &str, text: &str) -> DomainResult<()> {
        tracing::debug!(ticket_id, "adding card comment");
        self.post_comment(ticket_id, text).await
    }
}
