use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::numeric::opt_f64;
use crate::{
    error::{Provider, UpstreamError, UpstreamResult},
    model::{PricePoint, PriceSnapshot},
};

pub const COIN_ID: &str = "kaspa";

/// `/simple/price` body, keyed by coin id.
pub type CoinGeckoPrice = HashMap<String, CoinGeckoSimplePrice>;

#[derive(Debug, Deserialize)]
pub struct CoinGeckoSimplePrice {
    #[serde(default, deserialize_with = "opt_f64")]
    pub usd: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub usd_24h_change: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub usd_24h_vol: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub usd_market_cap: Option<f64>,
}

impl CoinGeckoSimplePrice {
    pub fn from_body(
        mut body: CoinGeckoPrice,
    ) -> UpstreamResult<CoinGeckoSimplePrice> {
        body.remove(COIN_ID).ok_or_else(|| {
            UpstreamError::decode(
                Provider::Price,
                format!("no entry for '{}'", COIN_ID),
            )
        })
    }

    pub fn into_snapshot(
        self,
        now: DateTime<Utc>,
    ) -> UpstreamResult<PriceSnapshot> {
        let price = self.usd.ok_or_else(|| {
            UpstreamError::decode(Provider::Price, "field 'usd' absent")
        })?;

        Ok(PriceSnapshot {
            price,
            change_24h: self.usd_24h_change,
            volume_24h: self.usd_24h_vol,
            market_cap: self.usd_market_cap,
            computed_at: now,
        })
    }
}

/// `/coins/{id}/market_chart` body.
#[derive(Debug, Deserialize)]
pub struct CoinGeckoMarketData {
    pub prices: Option<Vec<MarketData>>,
}

#[derive(Deserialize, Debug)]
pub struct MarketData(pub f64, pub f64);

impl CoinGeckoMarketData {
    pub fn into_points(self) -> UpstreamResult<Vec<PricePoint>> {
        let prices = self.prices.ok_or_else(|| {
            UpstreamError::decode(Provider::Price, "field 'prices' absent")
        })?;

        prices
            .into_iter()
            .map(|MarketData(ms, price)| {
                let timestamp = DateTime::from_timestamp_millis(ms as i64)
                    .ok_or_else(|| {
                        UpstreamError::decode(
                            Provider::Price,
                            format!("timestamp {} out of range", ms),
                        )
                    })?;
                Ok(PricePoint { timestamp, price })
            })
            .collect()
    }
}
