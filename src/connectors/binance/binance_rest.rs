// @file: market_adapter/src/connectors/binance/binance_rest.rs
// @description: Rate-limited HTTP transport with API-key and HMAC-SHA256 request signing.
// @author: LAS.

use hmac::{Hmac, Mac};
use log::{debug, warn};
use reqwest::Client;
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use crate::connectors::binance::enums::BinanceMethodType;
use crate::connectors::binance::schemas::BinanceStatusCode;
use crate::core::error::{AdapterError, AdapterResult};
use crate::core::interfaces::Clock;
use crate::utils::rate_limit::{RateLimitConfig, RateLimiter};

type HmacSha256 = Hmac<Sha256>;

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

//
// TYPE DEFINITIONS
//

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinanceCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl BinanceCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), api_secret: api_secret.into() }
    }
}

impl fmt::Debug for BinanceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct BinanceHttpClientConfig {
    pub base_url: String,
    pub credentials: Option<BinanceCredentials>,
    pub max_requests_per_minute: u32,
    pub request_timeout: Duration,
    pub recv_window_ms: Option<u64>,
}

impl BinanceHttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: None,
            max_requests_per_minute: 1200,
            request_timeout: Duration::from_secs(10),
            recv_window_ms: None,
        }
    }
}

pub struct BinanceHttpClient {
    client: Client,
    base_url: String,
    credentials: Option<BinanceCredentials>,
    clock: Arc<dyn Clock>,
    rate_limiter: RateLimiter,
    recv_window_ms: Option<u64>,
}


impl BinanceHttpClient {
    //
    // CONSTRUCTION
    //

    pub fn new(config: BinanceHttpClientConfig, clock: Arc<dyn Clock>) -> AdapterResult<Self> {
        // #1. Validate base URL early so bad config fails at startup
        let parsed: Url = Url::parse(&config.base_url)?;
        let base_url: String = parsed.as_str().trim_end_matches('/').to_string();

        // #2. Build transport
        let client: Client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url,
            credentials: config.credentials,
            clock,
            rate_limiter: RateLimiter::new(RateLimitConfig::per_minute(config.max_requests_per_minute)),
            recv_window_ms: config.recv_window_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.api_key.as_str())
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }


    //
    // PUBLIC INTERFACE
    //

    /// Unsigned request. The API key header is attached when credentials exist.
    pub async fn send_request(
        &self,
        method: BinanceMethodType,
        url_path: &str,
        payload: &[(String, String)],
    ) -> AdapterResult<String> {
        let query: String = encode_query(payload);
        self.execute(method, url_path, query, self.api_key()).await
    }

    /// Unsigned request that must carry the API key header.
    pub async fn send_keyed_request(
        &self,
        method: BinanceMethodType,
        url_path: &str,
        payload: &[(String, String)],
    ) -> AdapterResult<String> {
        let api_key: &str = self
            .api_key()
            .ok_or_else(|| AdapterError::MissingCredentials(url_path.to_string()))?;
        let query: String = encode_query(payload);
        self.execute(method, url_path, query, Some(api_key)).await
    }

    /// Timestamped request signed with HMAC-SHA256 over the encoded query.
    pub async fn sign_request(
        &self,
        method: BinanceMethodType,
        url_path: &str,
        payload: &[(String, String)],
    ) -> AdapterResult<String> {
        let credentials: &BinanceCredentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| AdapterError::MissingCredentials(url_path.to_string()))?;

        // #1. Append timestamp and receive window
        let mut params: Vec<(String, String)> = payload.to_vec();
        params.push(("timestamp".to_string(), self.clock.timestamp_ms().to_string()));
        if let Some(recv_window) = self.recv_window_ms {
            params.push(("recvWindow".to_string(), recv_window.to_string()));
        }

        // #2. Sign exactly what goes on the wire
        let query: String = encode_query(&params);
        let signature: String = sign_query(&credentials.api_secret, &query)?;
        let signed: String = format!("{}&signature={}", query, signature);

        self.execute(method, url_path, signed, Some(&credentials.api_key)).await
    }


    //
    // INTERNAL HELPERS
    //

    async fn execute(
        &self,
        method: BinanceMethodType,
        url_path: &str,
        query: String,
        api_key: Option<&str>,
    ) -> AdapterResult<String> {
        self.rate_limiter.acquire().await;

        let url: String = if query.is_empty() {
            format!("{}{}", self.base_url, url_path)
        } else {
            format!("{}{}?{}", self.base_url, url_path, query)
        };
        debug!("{} {}", method, url_path);

        let mut request = self.client.request(method.as_reqwest(), &url);
        if let Some(key) = api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status: u16 = response.status().as_u16();
        let body: String = response.text().await?;

        if !(200..300).contains(&status) {
            warn!("{} {} failed with HTTP {}: {}", method, url_path, status, body);
            return Err(map_http_error(status, &body));
        }

        Ok(body)
    }
}

pub fn encode_query(params: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

pub fn sign_query(secret: &str, query: &str) -> AdapterResult<String> {
    let mut mac: HmacSha256 = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AdapterError::Config(format!("invalid API secret: {}", e)))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub fn map_http_error(status: u16, body: &str) -> AdapterError {
    if status == 418 || status == 429 {
        return AdapterError::RateLimited { status, msg: body.to_string() };
    }

    match serde_json::from_str::<BinanceStatusCode>(body) {
        Ok(err) => AdapterError::Api { status, code: err.code, msg: err.msg },
        Err(_) => AdapterError::Api { status, code: 0, msg: body.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_query_matches_reference_vector() {
        // Reference request from the venue's signed-endpoint documentation
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";

        assert_eq!(
            sign_query(secret, query).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_encode_query_escapes_json_lists() {
        let params = vec![
            ("symbols".to_string(), r#"["BTCUSDT","ETHUSDT"]"#.to_string()),
            ("limit".to_string(), "5".to_string()),
        ];
        assert_eq!(
            encode_query(&params),
            "symbols=%5B%22BTCUSDT%22%2C%22ETHUSDT%22%5D&limit=5"
        );
    }

    #[test]
    fn test_map_http_error() {
        match map_http_error(429, "slow down") {
            AdapterError::RateLimited { status, .. } => assert_eq!(status, 429),
            other => panic!("unexpected {:?}", other),
        }

        match map_http_error(400, r#"{"code":-1121,"msg":"Invalid symbol."}"#) {
            AdapterError::Api { status, code, msg } => {
                assert_eq!(status, 400);
                assert_eq!(code, -1121);
                assert_eq!(msg, "Invalid symbol.");
            }
            other => panic!("unexpected {:?}", other),
        }

        match map_http_error(502, "<html>bad gateway</html>") {
            AdapterError::Api { code, msg, .. } => {
                assert_eq!(code, 0);
                assert!(msg.contains("bad gateway"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = BinanceCredentials::new("key", "very-secret");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("key"));
        assert!(!shown.contains("very-secret"));
    }
}
