//! Netatmo API client - forwards form posts with the access token attached

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use url::Url;

use super::envelope::ResponseEnvelope;
use super::token::TokenProvider;
use crate::config::NetatmoConfig;
use crate::error::AppError;

pub const ACCESS_TOKEN_FIELD: &str = "access_token";

const API_PATH: &str = "api/";

/// Vendor seam used by the HTTP handlers
#[async_trait]
pub trait VendorApi: Send + Sync {
    /// POST `params` to `api/<endpoint>` and normalize the answer
    async fn call(&self, endpoint: &str, params: Vec<(String, String)>) -> ResponseEnvelope;

    /// Token response obtained at login
    async fn token(&self) -> ResponseEnvelope;

    async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

pub struct NetatmoClient {
    http_client: Client,
    api_url: Url,
    tokens: TokenProvider,
}

impl NetatmoClient {
    /// Build the HTTP client and log in. Any login failure aborts.
    pub async fn connect(config: &NetatmoConfig, scope: String) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .build()?;

        let base_url = normalize_base_url(&config.base_url)?;
        let api_url = base_url
            .join(API_PATH)
            .map_err(|e| AppError::ConfigError(format!("invalid api url: {}", e)))?;

        let tokens = TokenProvider::login(http_client.clone(), &base_url, config, scope).await?;

        Ok(Self {
            http_client,
            api_url,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenProvider {
        &self.tokens
    }

    pub async fn post(
        &self,
        endpoint: &str,
        params: Vec<(String, String)>,
    ) -> Result<ResponseEnvelope, AppError> {
        let url = self
            .api_url
            .join(endpoint)
            .map_err(|e| AppError::BadRequest(format!("invalid endpoint {}: {}", endpoint, e)))?;

        let token = self.tokens.access_token().await?;

        let mut form = Vec::with_capacity(params.len() + 1);
        form.push((ACCESS_TOKEN_FIELD.to_string(), token));
        form.extend(params);

        tracing::debug!("[Netatmo] POST {} ({} fields)", url, form.len());

        let resp = self.http_client.post(url).form(&form).send().await?;
        let envelope = ResponseEnvelope::from_response(resp).await;

        if !envelope.is_success() {
            tracing::warn!(
                "[Netatmo] {} returned {}: {}",
                endpoint,
                envelope.status,
                envelope.message
            );
        }

        Ok(envelope)
    }
}

#[async_trait]
impl VendorApi for NetatmoClient {
    async fn call(&self, endpoint: &str, params: Vec<(String, String)>) -> ResponseEnvelope {
        match self.post(endpoint, params).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!("[Netatmo] {} failed: {}", endpoint, e);
                e.to_envelope()
            }
        }
    }

    async fn token(&self) -> ResponseEnvelope {
        self.tokens.token_envelope().await
    }

    async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.tokens.expires_at().await
    }
}

/// `Url::join` drops the last segment unless the base ends with a slash.
fn normalize_base_url(raw: &str) -> Result<Url, AppError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash)
        .map_err(|e| AppError::ConfigError(format!("invalid base_url {}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netatmo::test_support::{netatmo_config, spawn_fake_vendor, FakeVendor};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    async fn connect(vendor: &FakeVendor) -> NetatmoClient {
        let base_url = spawn_fake_vendor(vendor.clone()).await;
        let config = netatmo_config(base_url.as_str());
        NetatmoClient::connect(&config, "read_station".to_string())
            .await
            .unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.netatmo.com").unwrap().as_str(),
            "https://api.netatmo.com/"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:9000/netatmo")
                .unwrap()
                .join(API_PATH)
                .unwrap()
                .as_str(),
            "http://127.0.0.1:9000/netatmo/api/"
        );
        assert!(normalize_base_url("::nope").is_err());
    }

    #[tokio::test]
    async fn test_post_injects_access_token() {
        let vendor = FakeVendor::default();
        let client = connect(&vendor).await;

        client
            .call(
                "getstationsdata",
                vec![("get_favorites".to_string(), "false".to_string())],
            )
            .await;

        let form = vendor.last_call("api/getstationsdata").unwrap();
        assert_eq!(form.get(ACCESS_TOKEN_FIELD).map(String::as_str), Some("token-1"));
        assert_eq!(form.get("get_favorites").map(String::as_str), Some("false"));
    }

    #[tokio::test]
    async fn test_getstationsdata_fixture_passes_through() {
        let fixture: serde_json::Value =
            serde_json::from_str(include_str!("../../fixtures/getstationsdata.json")).unwrap();
        let vendor = FakeVendor::default().with_api_body(fixture.clone());
        let client = connect(&vendor).await;

        let envelope = client.call("getstationsdata", vec![]).await;

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.message, fixture);
        assert_eq!(envelope.message["status"], "ok");
        let body = envelope.message["body"].as_object().unwrap();
        assert!(body.contains_key("devices"));
        assert!(body.contains_key("user"));
    }

    #[tokio::test]
    async fn test_vendor_error_is_normalized() {
        let vendor = FakeVendor::default()
            .with_api_status(403)
            .with_api_body(json!({"error": {"code": 13, "message": "Operation forbidden"}}));
        let client = connect(&vendor).await;

        let envelope = client.call("homesdata", vec![]).await;
        assert_eq!(envelope.status, 403);
        assert_eq!(envelope.message, json!("Forbidden"));
    }

    #[tokio::test]
    async fn test_expired_token_is_renewed_before_call() {
        let vendor = FakeVendor::default().with_expires_in(0);
        let client = connect(&vendor).await;

        client.call("getuser", vec![]).await;

        assert_eq!(vendor.logins.load(Ordering::SeqCst), 2);
        let form = vendor.last_call("api/getuser").unwrap();
        assert_eq!(form.get(ACCESS_TOKEN_FIELD).map(String::as_str), Some("token-2"));
    }

    #[tokio::test]
    async fn test_unreachable_vendor_is_bad_gateway() {
        let vendor = FakeVendor::default();
        let mut client = connect(&vendor).await;
        // Nothing listens on port 9 of the loopback address.
        client.api_url = Url::parse("http://127.0.0.1:9/api/").unwrap();

        let envelope = client.call("getuser", vec![]).await;
        assert_eq!(envelope.status, 502);
        assert_eq!(envelope.message, json!("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_slow_vendor_is_gateway_timeout() {
        let vendor = FakeVendor::default().with_api_delay(Duration::from_secs(3));
        let base_url = spawn_fake_vendor(vendor.clone()).await;
        let mut config = netatmo_config(base_url.as_str());
        config.timeout_secs = 1;
        let client = NetatmoClient::connect(&config, "read_station".to_string())
            .await
            .unwrap();

        let envelope = client.call("getstationsdata", vec![]).await;
        assert_eq!(envelope, ResponseEnvelope::text(504, "Gateway Time-out"));
    }

    #[tokio::test]
    async fn test_token_is_exposed() {
        let vendor = FakeVendor::default();
        let client = connect(&vendor).await;

        let envelope = client.token().await;
        assert_eq!(envelope.message["access_token"], "token-1");
        assert!(client.token_expires_at().await.is_some());
    }
}
