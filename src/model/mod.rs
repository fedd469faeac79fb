pub use self::{
    mining::{MiningInput, MiningParams, MiningProfitability},
    network::{
        BlockDagInfo, HealthStatus, NetworkHealth, NetworkStats, NodeInfo,
        SubScore,
    },
    price::{PriceHistory, PricePoint, PriceSnapshot, Timeframe},
    token::{TokenAnalytics, TokenInfo, TokenList},
    wallet::WalletSnapshot,
    whale::{
        RichListEntry, WhaleList, WhaleRecord, WhaleStatistics, UNKNOWN_LABEL,
    },
};

mod mining;
mod network;
mod price;
mod token;
mod wallet;
mod whale;
