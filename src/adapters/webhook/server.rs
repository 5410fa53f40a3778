//! Webhook HTTP server.
//!
//! Accepts Telegram updates on a single `POST` path. Requests on any other
//! path or method, or without the shared secret header, get a bare 404.
//! Accepted updates are acknowledged immediately and handled on a spawned
//! task, so a slow workflow never makes the platform retry delivery.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::domain::models::{ServerConfig, Update};
use crate::services::ConversationEngine;

/// Header carrying the secret registered with `setWebhook`.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Shared state for the webhook handler.
struct AppState {
    engine: Arc<ConversationEngine>,
    secret_token: String,
}

/// Webhook server.
pub struct WebhookServer {
    config: ServerConfig,
    engine: Arc<ConversationEngine>,
}

impl WebhookServer {
    pub const fn new(engine: Arc<ConversationEngine>, config: ServerConfig) -> Self {
        Self { config, engine }
    }

    /// Build the router.
    pub fn build_router(&self) -> Router {
        let state = Arc::new(AppState {
            engine: Arc::clone(&self.engine),
            secret_token: self.config.secret_token.clone(),
        });

        Router::new()
            .route(
                &self.config.webhook_path,
                post(receive_update).fallback(not_found),
            )
            .fallback(not_found)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Start the server and run until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
        })
        .await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("invalid server address")?;
        let router = self.build_router();

        tracing::info!(%addr, path = %self.config.webhook_path, "webhook server listening");

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn receive_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let presented = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != state.secret_token {
        tracing::warn!("webhook request with wrong secret rejected");
        return StatusCode::NOT_FOUND.into_response();
    }

    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            let engine = Arc::clone(&state.engine);
            tokio::spawn(async move {
                engine.handle_update(update).await;
            });
        }
        Err(err) => {
            tracing::warn!(error = %err, "unparseable update acknowledged and ignored");
        }
    }

    ([(header::CONTENT_TYPE, "text/plain")], "OK").into_response()
}
