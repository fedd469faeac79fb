use serde::Deserialize;

use super::numeric::{opt_f64, opt_u64};
use crate::{
    error::{Provider, UpstreamError, UpstreamResult},
    model::TokenInfo,
};

const SUCCESS_MESSAGE: &str = "successful";

/// `/krc20/tokenlist` body.
#[derive(Debug, Deserialize)]
pub struct KasplexTokenList {
    pub message: Option<String>,
    pub result: Option<Vec<KasplexToken>>,
}

/// Supply fields are integers scaled by `10^dec`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KasplexToken {
    pub tick: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub minted: Option<f64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub dec: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub holder_total: Option<u64>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub price: Option<f64>,
    #[serde(default, alias = "market_cap", deserialize_with = "opt_f64")]
    pub market_cap: Option<f64>,
    #[serde(
        default,
        alias = "volume_24h",
        alias = "volume24H",
        deserialize_with = "opt_f64"
    )]
    pub volume24h: Option<f64>,
    #[serde(
        default,
        alias = "change_24h",
        alias = "change24H",
        deserialize_with = "opt_f64"
    )]
    pub change24h: Option<f64>,
}

impl KasplexTokenList {
    pub fn into_tokens(self) -> UpstreamResult<Vec<TokenInfo>> {
        match self.message.as_deref() {
            Some(SUCCESS_MESSAGE) => {},
            other => {
                return Err(UpstreamError::decode(
                    Provider::Tokens,
                    format!("unexpected message {:?}", other),
                ))
            },
        }

        self.result
            .ok_or_else(|| {
                UpstreamError::decode(Provider::Tokens, "field 'result' absent")
            })?
            .into_iter()
            .map(KasplexToken::into_token)
            .collect()
    }
}

impl KasplexToken {
    pub fn into_token(self) -> UpstreamResult<TokenInfo> {
        let symbol = self
            .tick
            .map(|tick| tick.trim().to_uppercase())
            .filter(|tick| !tick.is_empty())
            .ok_or_else(|| {
                UpstreamError::decode(Provider::Tokens, "token without tick")
            })?;

        let scale = self.dec.and_then(|dec| {
            i32::try_from(dec).ok().map(|dec| 10f64.powi(dec))
        });
        let scaled = |raw: Option<f64>| match (raw, scale) {
            (Some(raw), Some(scale)) => Some(raw / scale),
            _ => None,
        };

        Ok(TokenInfo {
            name: self.name,
            max_supply: scaled(self.max),
            minted: scaled(self.minted),
            holders: self.holder_total,
            price: self.price,
            market_cap: self.market_cap,
            volume_24h: self.volume24h,
            change_24h: self.change24h,
            state: self.state,
            symbol,
        })
    }
}
