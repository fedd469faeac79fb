use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_LABEL: &str = "Unknown";

/// One address from the explorer rich list, balance in KAS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichListEntry {
    pub address: String,
    pub balance: BigDecimal,
    pub tx_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhaleRecord {
    pub rank: u32,
    pub address: String,
    pub label: String,
    pub balance: BigDecimal,
    pub percentage_of_supply: BigDecimal,
    pub tx_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhaleList {
    pub whales: Vec<WhaleRecord>,
    pub count: usize,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhaleStatistics {
    pub total_whales: usize,
    pub total_whale_balance: BigDecimal,
    pub whale_concentration_percentage: BigDecimal,
    pub average_whale_balance: Option<BigDecimal>,
    pub largest_whale_balance: Option<BigDecimal>,
    pub smallest_whale_balance: Option<BigDecimal>,
    pub computed_at: DateTime<Utc>,
}
