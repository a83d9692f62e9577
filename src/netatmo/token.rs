//! OAuth2 password-grant token provider

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use super::envelope::ResponseEnvelope;
use crate::config::NetatmoConfig;
use crate::error::AppError;

const TOKEN_PATH: &str = "oauth2/token";

#[derive(Debug, Clone)]
struct TokenInfo {
    access_token: String,
    /// `None` when the vendor did not announce a lifetime
    expires_at: Option<Instant>,
    expires_at_utc: Option<DateTime<Utc>>,
    /// Full token response, returned by `GET /netatmo/token`
    raw: Value,
}

impl TokenInfo {
    fn is_valid(&self) -> bool {
        self.expires_at.map_or(true, |at| at > Instant::now())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResult {
    access_token: String,
    expires_in: Option<i64>,
}

struct Credentials {
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

pub struct TokenProvider {
    http_client: Client,
    token_url: Url,
    credentials: Credentials,
    scope: String,
    expiry_margin: Duration,
    token: RwLock<TokenInfo>,
}

impl TokenProvider {
    /// Log in once; fails instead of handing out an empty token.
    pub async fn login(
        http_client: Client,
        base_url: &Url,
        config: &NetatmoConfig,
        scope: String,
    ) -> Result<Self, AppError> {
        let token_url = base_url
            .join(TOKEN_PATH)
            .map_err(|e| AppError::ConfigError(format!("invalid token url: {}", e)))?;

        let mut provider = Self {
            http_client,
            token_url,
            credentials: Credentials {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                username: config.username.clone(),
                password: config.password.clone(),
            },
            scope,
            expiry_margin: Duration::from_secs(config.token_expiry_margin_secs),
            token: RwLock::new(TokenInfo {
                access_token: String::new(),
                expires_at: None,
                expires_at_utc: None,
                raw: Value::Null,
            }),
        };

        let info = provider.request_token().await?;
        *provider.token.get_mut() = info;

        Ok(provider)
    }

    async fn request_token(&self) -> Result<TokenInfo, AppError> {
        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("grant_type", "password"),
            ("scope", self.scope.as_str()),
        ];

        let envelope = match self
            .http_client
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
        {
            Ok(resp) => ResponseEnvelope::from_response(resp).await,
            Err(e) => {
                tracing::error!("[Netatmo] Token request failed: {}", e);
                ResponseEnvelope::from_transport_error(&e)
            }
        };

        if !envelope.is_success() {
            return Err(AppError::TokenError {
                status: envelope.status,
                message: envelope
                    .message
                    .as_str()
                    .unwrap_or("token request failed")
                    .to_string(),
            });
        }

        let result: TokenResult =
            serde_json::from_value(envelope.message.clone()).map_err(|e| AppError::TokenError {
                status: 502,
                message: format!("token response without access_token: {}", e),
            })?;

        if result.access_token.is_empty() {
            return Err(AppError::TokenError {
                status: 502,
                message: "token response carried an empty access_token".to_string(),
            });
        }

        let lifetime = result.expires_in.map(|secs| {
            Duration::from_secs(secs.max(0) as u64).saturating_sub(self.expiry_margin)
        });
        // Lifetimes too large to represent are treated as never expiring.
        let expires_at = lifetime.and_then(|d| Instant::now().checked_add(d));
        let expires_at_utc = lifetime
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .and_then(|d| Utc::now().checked_add_signed(d));

        match expires_at_utc {
            Some(at) => tracing::info!("[Netatmo] Token acquired, valid until {}", at.to_rfc3339()),
            None => tracing::info!("[Netatmo] Token acquired, no expiry announced"),
        }

        Ok(TokenInfo {
            access_token: result.access_token,
            expires_at,
            expires_at_utc,
            raw: envelope.message,
        })
    }

    /// Current access token, logging in again if it has expired.
    pub async fn access_token(&self) -> Result<String, AppError> {
        {
            let token = self.token.read().await;
            if token.is_valid() {
                return Ok(token.access_token.clone());
            }
        }

        let mut token = self.token.write().await;
        // Another request may have logged in while we waited for the lock.
        if token.is_valid() {
            return Ok(token.access_token.clone());
        }

        tracing::info!("[Netatmo] Token expired, logging in again");
        *token = self.request_token().await?;
        Ok(token.access_token.clone())
    }

    /// Stored token response wrapped as a success envelope
    pub async fn token_envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope::new(200, self.token.read().await.raw.clone())
    }

    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.read().await.expires_at_utc
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netatmo::test_support::{netatmo_config, spawn_fake_vendor, FakeVendor};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    async fn login(vendor: &FakeVendor) -> Result<TokenProvider, AppError> {
        let base_url = spawn_fake_vendor(vendor.clone()).await;
        let config = netatmo_config(base_url.as_str());
        TokenProvider::login(Client::new(), &base_url, &config, "read_station".to_string()).await
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let vendor = FakeVendor::default();
        let provider = tokio_test::assert_ok!(login(&vendor).await);

        assert_eq!(provider.access_token().await.unwrap(), "token-1");
        assert_eq!(vendor.logins.load(Ordering::SeqCst), 1);
        assert!(provider.expires_at().await.is_some());
        assert_eq!(provider.scope(), "read_station");

        let login_form = vendor.last_call("oauth2/token").unwrap();
        assert_eq!(login_form.get("grant_type").map(String::as_str), Some("password"));
        assert_eq!(login_form.get("scope").map(String::as_str), Some("read_station"));
        assert_eq!(login_form.get("username").map(String::as_str), Some("user@example.com"));
    }

    #[tokio::test]
    async fn test_login_failure_is_fatal() {
        let vendor = FakeVendor::default().with_token_status(403);
        let err = login(&vendor).await.err().expect("login should fail");

        match err {
            AppError::TokenError { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_login_without_access_token_is_fatal() {
        let vendor = FakeVendor::default().with_token_body(json!({"error": "invalid_grant"}));
        let err = login(&vendor).await.err().expect("login should fail");
        assert!(matches!(err, AppError::TokenError { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_valid_token_is_reused() {
        let vendor = FakeVendor::default();
        let provider = login(&vendor).await.unwrap();

        provider.access_token().await.unwrap();
        provider.access_token().await.unwrap();
        assert_eq!(vendor.logins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_token_triggers_login() {
        // expires_in below the 60s margin: expired as soon as it is stored
        let vendor = FakeVendor::default().with_expires_in(30);
        let provider = login(&vendor).await.unwrap();
        assert_eq!(vendor.logins.load(Ordering::SeqCst), 1);

        assert_eq!(provider.access_token().await.unwrap(), "token-2");
        assert_eq!(vendor.logins.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_huge_expires_in_does_not_overflow() {
        let vendor = FakeVendor::default().with_expires_in(10_000_000_000_000);
        let provider = tokio_test::assert_ok!(login(&vendor).await);

        assert!(provider.expires_at().await.is_none());
        assert_eq!(provider.access_token().await.unwrap(), "token-1");
        assert_eq!(vendor.logins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_relogin() {
        // Two seconds of validity once the 60s margin is taken off
        let vendor = FakeVendor::default().with_expires_in(62);
        let provider = Arc::new(login(&vendor).await.unwrap());
        tokio::time::sleep(Duration::from_millis(2100)).await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let provider = provider.clone();
                tokio::spawn(async move { provider.access_token().await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "token-2");
        }

        assert_eq!(vendor.logins.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_token_envelope_returns_raw_response() {
        let vendor = FakeVendor::default();
        let provider = login(&vendor).await.unwrap();

        let envelope = provider.token_envelope().await;
        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.message["access_token"], "token-1");
        assert_eq!(envelope.message["refresh_token"], "refresh-1");
        assert!(envelope.message["scope"].is_array());
    }
}
