use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub address: String,
    /// KAS.
    pub balance: BigDecimal,
    pub balance_usd: Option<f64>,
    pub transaction_count: Option<u64>,
    pub computed_at: DateTime<Utc>,
}
