pub use self::{
    coin_gecko::{CoinGeckoMarketData, CoinGeckoPrice, CoinGeckoSimplePrice},
    explorer::{AddressBalance, AddressTxCount, RichListItem},
    kaspa_api::{BlockDagBody, KaspadInfo, NetworkStatsBody},
    kasplex::{KasplexToken, KasplexTokenList},
};

mod coin_gecko;
mod explorer;
mod kaspa_api;
mod kasplex;
mod numeric;
