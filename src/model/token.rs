use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A KRC-20 token as reported by the token-list provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: Option<String>,
    pub max_supply: Option<f64>,
    pub minted: Option<f64>,
    pub holders: Option<u64>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub change_24h: Option<f64>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenList {
    pub tokens: Vec<TokenInfo>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAnalytics {
    pub total_tokens: usize,
    pub tokens_with_market_data: usize,
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    pub total_holders: u64,
    /// Mean over tokens reporting a 24h change; `0` when none do.
    pub average_change_24h: f64,
    pub gainers_count: usize,
    pub losers_count: usize,
    pub top_gainer: Option<TokenInfo>,
    pub top_loser: Option<TokenInfo>,
    pub highest_volume: Option<TokenInfo>,
    pub computed_at: DateTime<Utc>,
}
