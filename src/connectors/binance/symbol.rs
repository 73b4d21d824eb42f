// @file: market_adapter/src/connectors/binance/symbol.rs
// @description: Validated venue symbol and symbol-list value types.
// @author: LAS.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use crate::connectors::binance::enums::BinanceAccountType;
use crate::core::error::{AdapterError, AdapterResult};

//
// SINGLE SYMBOL
//

/// A venue symbol in wire form: uppercase, no separators, no `-PERP` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinanceSymbol(String);

impl BinanceSymbol {
    pub fn new(raw: &str) -> AdapterResult<Self> {
        // #1. Normalize
        let normalized: String = raw
            .to_uppercase()
            .replace(' ', "")
            .replace('/', "")
            .replace("-PERP", "");

        // #2. Validate
        if normalized.is_empty() {
            return Err(AdapterError::InvalidSymbol(raw.to_string()));
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AdapterError::InvalidSymbol(raw.to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The symbol used for internal instrument ids on the given account type.
    /// Perpetual futures carry a `-PERP` suffix; dated futures keep their expiry digits.
    pub fn to_internal(&self, account_type: BinanceAccountType) -> String {
        if !account_type.is_futures() {
            return self.0.clone();
        }

        let ends_with_digit: bool = self.0.chars().last().map_or(false, |c| c.is_ascii_digit());
        if ends_with_digit {
            self.0.clone()
        } else if self.0.ends_with("_PERP") {
            self.0.replace('_', "-")
        } else {
            format!("{}-PERP", self.0)
        }
    }
}

impl fmt::Display for BinanceSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BinanceSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BinanceSymbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        BinanceSymbol::new(&raw).map_err(serde::de::Error::custom)
    }
}


//
// SYMBOL LIST
//

/// A list of symbols encoded the way the venue expects in a query string,
/// e.g. `["BTCUSDT","ETHUSDT"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinanceSymbols(String);

impl BinanceSymbols {
    pub fn new<S: AsRef<str>>(symbols: &[S]) -> AdapterResult<Self> {
        if symbols.is_empty() {
            return Err(AdapterError::InvalidSymbol("empty symbol list".to_string()));
        }

        let parsed: Vec<BinanceSymbol> = symbols
            .iter()
            .map(|s| BinanceSymbol::new(s.as_ref()))
            .collect::<AdapterResult<Vec<_>>>()?;

        Ok(Self(serde_json::to_string(&parsed)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_vec(&self) -> AdapterResult<Vec<BinanceSymbol>> {
        Ok(serde_json::from_str(&self.0)?)
    }
}

impl fmt::Display for BinanceSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BinanceSymbols {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
