//! Trello API request and response models.
//!
//! Only the card fields the bot touches are modelled.

use serde::{Deserialize, Serialize};

/// A card returned by `GET /1/cards/{id}?fields=desc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrelloCard {
    pub id: String,
    /// Free-text description; absent on cards that never had one.
    #[serde(default)]
    pub desc: String,
}

/// Body of `PUT /1/cards/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct CardUpdateRequest<'a> {
    pub desc: &'a str,
}

/// Body of `POST /1/cards/{id}/actions/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest<'a> {
    pub text: &'a str,
}
