//! Google service-account authorization.
//!
//! Mints a short-lived RS256 assertion for the service user, exchanges it
//! at the token endpoint and caches the bearer token until shortly before
//! it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::SheetsConfig;
use crate::infrastructure::logging::scrub;

/// OAuth scope granting read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

const fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Bearer tokens for one service account.
pub struct ServiceAccountAuth {
    http: Client,
    service_user: String,
    key: EncodingKey,
    token_uri: String,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("service_user", &self.service_user)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountAuth {
    /// Parse the service key.
    ///
    /// Keys pasted into environment variables often carry literal `\n`
    /// sequences; those are turned back into newlines first.
    pub fn new(http: Client, config: &SheetsConfig) -> DomainResult<Self> {
        let pem = config.service_key.replace("\\n", "\n");
        let key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| DomainError::Authentication(format!("invalid service key: {e}")))?;

        Ok(Self {
            http,
            service_user: config.service_user.clone(),
            key,
            token_uri: config.token_uri.clone(),
            cached: Mutex::new(None),
        })
    }

    /// A valid bearer token, minted on first use and after expiry.
    pub async fn bearer_token(&self) -> DomainResult<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        let token = self.exchange(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn assertion(&self, now: DateTime<Utc>) -> DomainResult<String> {
        let claims = AssertionClaims {
            iss: self.service_user.clone(),
            scope: SPREADSHEETS_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| DomainError::Authentication(format!("failed to sign assertion: {e}")))
    }

    async fn exchange(&self, now: DateTime<Utc>) -> DomainResult<CachedToken> {
        let assertion = self.assertion(now)?;
        tracing::debug!(service_user = %self.service_user, "requesting service account token");

        let resp = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| {
                DomainError::Authentication(scrub(&format!("token request failed: {e}")))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.map_err(|e| {
                DomainError::Authentication(scrub(&format!(
                    "token endpoint returned {status} with unreadable body: {e}"
                )))
            })?;
            return Err(DomainError::Authentication(scrub(&format!(
                "token endpoint returned {status}: {body}"
            ))));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Authentication(format!("token parse failed: {e}")))?;

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_key() {
        let config = SheetsConfig {
            service_user: "bot@example.iam.gserviceaccount.com".to_string(),
            service_key: "not a key".to_string(),
            ..SheetsConfig::default()
        };
        assert!(matches!(
            ServiceAccountAuth::new(Client::new(), &config),
            Err(DomainError::Authentication(_))
        ));
    }
}
