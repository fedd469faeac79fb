use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::{
    error::UpstreamResult,
    model::{
        BlockDagInfo, NetworkStats, NodeInfo, PricePoint, PriceSnapshot,
        RichListEntry, TokenInfo,
    },
};

/// Every outbound call the service makes, already mapped into the internal
/// model. Implementations never fill in defaults for absent fields.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn price(&self) -> UpstreamResult<PriceSnapshot>;

    /// `days` is the price provider's range parameter (`"7"`, `"max"`).
    async fn price_history(
        &self,
        days: &str,
    ) -> UpstreamResult<Vec<PricePoint>>;

    async fn network_stats(&self) -> UpstreamResult<NetworkStats>;

    async fn node_info(&self) -> UpstreamResult<NodeInfo>;

    async fn blockdag(&self) -> UpstreamResult<BlockDagInfo>;

    /// Richest addresses, balances in KAS, largest first as reported.
    async fn rich_list(
        &self,
        limit: usize,
    ) -> UpstreamResult<Vec<RichListEntry>>;

    /// Balance in KAS.
    async fn address_balance(
        &self,
        address: &str,
    ) -> UpstreamResult<BigDecimal>;

    async fn address_tx_count(
        &self,
        address: &str,
    ) -> UpstreamResult<Option<u64>>;

    async fn token_list(&self) -> UpstreamResult<Vec<TokenInfo>>;
}
