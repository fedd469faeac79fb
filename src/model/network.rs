use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot from the network-stats provider. Every field is optional: the
/// provider may omit any of them and derivations decide what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Hashes per second.
    pub hashrate: Option<f64>,
    pub blocks_per_second: Option<f64>,
    pub node_count: Option<u64>,
    pub orphan_rate: Option<f64>,
    pub mempool_size: Option<u64>,
    pub block_count: Option<u64>,
    pub difficulty: Option<f64>,
    /// Circulating supply in KAS.
    pub circulating_supply: Option<f64>,
    pub transactions_per_minute: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

/// Node-level info from `/info/kaspad`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub mempool_size: Option<u64>,
    pub is_synced: Option<bool>,
    pub server_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDagInfo {
    pub network_name: Option<String>,
    pub block_count: Option<u64>,
    pub header_count: Option<u64>,
    pub tip_count: Option<usize>,
    pub difficulty: Option<f64>,
    pub virtual_daa_score: Option<u64>,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    /// Fixed thresholds on a 0-100 scale.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            HealthStatus::Excellent
        } else if score >= 70.0 {
            HealthStatus::Good
        } else if score >= 50.0 {
            HealthStatus::Fair
        } else {
            HealthStatus::Poor
        }
    }
}

/// One of the four 0-25 health components. `score` is `None` when the
/// field it derives from was absent in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub score: Option<f64>,
    pub status: Option<HealthStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkHealth {
    pub overall_score: f64,
    pub status: HealthStatus,
    pub decentralization: SubScore,
    pub security: SubScore,
    pub speed: SubScore,
    pub stability: SubScore,
    pub missing_inputs: Vec<String>,
    pub computed_at: DateTime<Utc>,
}
