use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::numeric::{opt_f64, opt_u64};
use crate::model::{BlockDagInfo, NetworkStats, NodeInfo};

/// `/info/network` body. Field names are accepted in snake or camel case.
#[derive(Debug, Deserialize)]
pub struct NetworkStatsBody {
    #[serde(default, deserialize_with = "opt_f64")]
    pub hashrate: Option<f64>,
    #[serde(default, alias = "blocksPerSecond", deserialize_with = "opt_f64")]
    pub blocks_per_second: Option<f64>,
    #[serde(default, alias = "nodeCount", deserialize_with = "opt_u64")]
    pub nodes: Option<u64>,
    #[serde(default, alias = "orphanRate", deserialize_with = "opt_f64")]
    pub orphan_rate: Option<f64>,
    #[serde(default, alias = "mempoolSize", deserialize_with = "opt_u64")]
    pub mempool_size: Option<u64>,
    #[serde(default, alias = "blockCount", deserialize_with = "opt_u64")]
    pub block_count: Option<u64>,
    #[serde(
        default,
        alias = "difficulty",
        alias = "networkDifficulty",
        deserialize_with = "opt_f64"
    )]
    pub network_difficulty: Option<f64>,
    #[serde(
        default,
        alias = "circulatingSupply",
        alias = "circulating_supply",
        deserialize_with = "opt_f64"
    )]
    pub supply: Option<f64>,
    #[serde(
        default,
        alias = "transactionsPerMinute",
        deserialize_with = "opt_f64"
    )]
    pub transactions_per_minute: Option<f64>,
}

impl NetworkStatsBody {
    pub fn into_stats(self, fetched_at: DateTime<Utc>) -> NetworkStats {
        NetworkStats {
            hashrate: self.hashrate,
            blocks_per_second: self.blocks_per_second,
            node_count: self.nodes,
            orphan_rate: self.orphan_rate,
            mempool_size: self.mempool_size,
            block_count: self.block_count,
            difficulty: self.network_difficulty,
            circulating_supply: self.supply,
            transactions_per_minute: self.transactions_per_minute,
            fetched_at,
        }
    }
}

/// `/info/kaspad` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KaspadInfo {
    #[serde(default, deserialize_with = "opt_u64")]
    pub mempool_size: Option<u64>,
    pub is_synced: Option<bool>,
    pub server_version: Option<String>,
}

impl From<KaspadInfo> for NodeInfo {
    fn from(value: KaspadInfo) -> Self {
        NodeInfo {
            mempool_size: value.mempool_size,
            is_synced: value.is_synced,
            server_version: value.server_version,
        }
    }
}

/// `/info/blockdag` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDagBody {
    pub network_name: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub block_count: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub header_count: Option<u64>,
    pub tip_hashes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub difficulty: Option<f64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub virtual_daa_score: Option<u64>,
}

impl BlockDagBody {
    pub fn into_info(self, computed_at: DateTime<Utc>) -> BlockDagInfo {
        BlockDagInfo {
            network_name: self.network_name,
            block_count: self.block_count,
            header_count: self.header_count,
            tip_count: self.tip_hashes.map(|tips| tips.len()),
            difficulty: self.difficulty,
            virtual_daa_score: self.virtual_daa_score,
            computed_at,
        }
    }
}
