// @file: market_adapter/src/connectors/binance/endpoint.rs
// @description: One REST path with its allowed methods, each bound to a security type.
// @author: LAS.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use crate::connectors::binance::binance_rest::BinanceHttpClient;
use crate::connectors::binance::enums::{BinanceMethodType, BinanceSecurityType};
use crate::core::error::{AdapterError, AdapterResult};

//
// TYPE DEFINITIONS
//

pub struct BinanceHttpEndpoint {
    client: Arc<BinanceHttpClient>,
    methods: HashMap<BinanceMethodType, BinanceSecurityType>,
    url_path: String,
}

impl BinanceHttpEndpoint {
    pub fn new(
        client: Arc<BinanceHttpClient>,
        methods: &[(BinanceMethodType, BinanceSecurityType)],
        url_path: impl Into<String>,
    ) -> Self {
        Self {
            client,
            methods: methods.iter().copied().collect(),
            url_path: url_path.into(),
        }
    }

    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    pub fn security_type(&self, method: BinanceMethodType) -> AdapterResult<BinanceSecurityType> {
        self.methods.get(&method).copied().ok_or_else(|| AdapterError::MethodNotAvailable {
            method: method.to_string(),
            path: self.url_path.clone(),
        })
    }

    /// Sends `params` as the query string and returns the raw response body.
    pub async fn call<P: Serialize>(&self, method: BinanceMethodType, params: &P) -> AdapterResult<String> {
        // #1. Resolve security before touching the network
        let security: BinanceSecurityType = self.security_type(method)?;
        let payload: Vec<(String, String)> = to_query_pairs(params)?;

        // #2. Dispatch
        match security {
            BinanceSecurityType::None => {
                self.client.send_request(method, &self.url_path, &payload).await
            }
            BinanceSecurityType::UserStream | BinanceSecurityType::MarketData => {
                self.client.send_keyed_request(method, &self.url_path, &payload).await
            }
            BinanceSecurityType::Trade | BinanceSecurityType::Margin | BinanceSecurityType::UserData => {
                self.client.sign_request(method, &self.url_path, &payload).await
            }
        }
    }

    pub async fn call_json<P: Serialize, T: DeserializeOwned>(
        &self,
        method: BinanceMethodType,
        params: &P,
    ) -> AdapterResult<T> {
        let body: String = self.call(method, params).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Flattens a parameter struct into query pairs. `None` fields are omitted.
pub fn to_query_pairs<P: Serialize>(params: &P) -> AdapterResult<Vec<(String, String)>> {
    match serde_json::to_value(params)? {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect()),
        other => Err(AdapterError::InvalidParameters(format!(
            "request parameters must serialize to an object, got {}",
            other
        ))),
    }
}
