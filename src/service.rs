//! One operation per API route.
//!
//! Inputs are validated before anything touches the cache or an upstream
//! provider. Upstream fetches and derived metrics are memoized separately,
//! so a derived metric never outlives its own TTL even when its inputs are
//! cached for longer.

use std::{collections::HashMap, str::FromStr, sync::Arc};

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::Utc;
use tracing::warn;

use crate::{
    cache_keys::{self, CacheKey},
    configuration::CacheTtl,
    error::{Error, UpstreamResult},
    helpers::is_valid_address,
    metrics,
    model::{
        BlockDagInfo, MiningInput, MiningParams, MiningProfitability,
        NetworkHealth, NetworkStats, NodeInfo, PriceHistory, PriceSnapshot,
        RichListEntry, Timeframe, TokenAnalytics, TokenInfo, TokenList,
        WalletSnapshot, WhaleList, WhaleStatistics,
    },
    provider::Upstream,
    result_cache::ResultCache,
};

pub const DEFAULT_HISTORY_LIMIT: i64 = 100;
pub const MAX_HISTORY_LIMIT: i64 = 1_000;
pub const DEFAULT_WHALE_LIMIT: i64 = 10;
pub const MAX_WHALE_LIMIT: i64 = 100;
/// Rich-list depth used for whale statistics.
pub const WHALE_STATISTICS_DEPTH: usize = 100;
pub const DEFAULT_TRENDING_LIMIT: i64 = 5;
pub const MAX_TRENDING_LIMIT: i64 = 50;
const MAX_SYMBOL_LEN: usize = 32;

pub struct Telemetry {
    cache: ResultCache,
    upstream: Arc<dyn Upstream>,
    ttl: CacheTtl,
    mining: MiningParams,
    supply: BigDecimal,
    labels: HashMap<String, String>,
}

impl Telemetry {
    pub fn new(
        cache: ResultCache,
        upstream: Arc<dyn Upstream>,
        ttl: CacheTtl,
        mining: MiningParams,
        supply: BigDecimal,
        labels: HashMap<String, String>,
    ) -> Self {
        Telemetry {
            cache,
            upstream,
            ttl,
            mining,
            supply,
            labels,
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    async fn fetch_price(&self) -> UpstreamResult<PriceSnapshot> {
        let key = CacheKey::new(cache_keys::PRICE, "current_price");
        self.cache
            .cached(&key, self.ttl.price, || self.upstream.price())
            .await
    }

    async fn fetch_network_stats(&self) -> UpstreamResult<NetworkStats> {
        let key = CacheKey::new(cache_keys::NETWORK_STATS, "network_stats");
        self.cache
            .cached(&key, self.ttl.network_stats, || {
                self.upstream.network_stats()
            })
            .await
    }

    async fn fetch_node_info(&self) -> UpstreamResult<NodeInfo> {
        let key = CacheKey::new(cache_keys::NODE_INFO, "node_info");
        self.cache
            .cached(&key, self.ttl.network_stats, || self.upstream.node_info())
            .await
    }

    async fn fetch_rich_list(
        &self,
        limit: usize,
    ) -> UpstreamResult<Vec<RichListEntry>> {
        let key = CacheKey::new(cache_keys::WHALES, "rich_list").arg(&limit);
        self.cache
            .cached(&key, self.ttl.whales, || self.upstream.rich_list(limit))
            .await
    }

    async fn fetch_tokens(&self) -> UpstreamResult<Vec<TokenInfo>> {
        let key = CacheKey::new(cache_keys::KRC20, "token_list");
        self.cache
            .cached(&key, self.ttl.tokens, || self.upstream.token_list())
            .await
    }

    pub async fn price(&self) -> Result<PriceSnapshot, Error> {
        Ok(self.fetch_price().await?)
    }

    pub async fn price_history(
        &self,
        timeframe: &str,
        limit: Option<i64>,
    ) -> Result<PriceHistory, Error> {
        let timeframe = Timeframe::from_str(timeframe)?;
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
            return Err(Error::InputValidation(format!(
                "limit must be between 1 and {}",
                MAX_HISTORY_LIMIT
            )));
        }

        let key = CacheKey::new(cache_keys::PRICE_HISTORY, "price_history")
            .kwarg("timeframe", &timeframe)
            .kwarg("limit", &limit);

        self.cache
            .cached(&key, self.ttl.price_history, || async {
                let points =
                    self.upstream.price_history(timeframe.days()).await?;
                let skip = points.len().saturating_sub(limit as usize);
                Ok(PriceHistory {
                    timeframe,
                    prices: points.into_iter().skip(skip).collect(),
                })
            })
            .await
    }

    pub async fn network_stats(&self) -> Result<NetworkStats, Error> {
        Ok(self.fetch_network_stats().await?)
    }

    pub async fn network_health(&self) -> Result<NetworkHealth, Error> {
        let key = CacheKey::new(cache_keys::NETWORK_HEALTH, "network_health");
        self.cache
            .cached(&key, self.ttl.network_health, || async {
                let (stats, node_info) = tokio::join!(
                    self.fetch_network_stats(),
                    self.fetch_node_info()
                );
                if let Err(e) = &node_info {
                    warn!("Node info unavailable for network health: {}", e);
                }
                metrics::network_health(stats, node_info, Utc::now())
            })
            .await
    }

    pub async fn blockdag(&self) -> Result<BlockDagInfo, Error> {
        let key = CacheKey::new(cache_keys::BLOCKDAG, "blockdag_metrics");
        let info = self
            .cache
            .cached(&key, self.ttl.blockdag, || self.upstream.blockdag())
            .await?;
        Ok(info)
    }

    pub async fn mining(
        &self,
        input: MiningInput,
    ) -> Result<MiningProfitability, Error> {
        input.validate()?;

        let key = CacheKey::new(cache_keys::MINING, "profitability")
            .kwarg("hashrate", &input.hashrate)
            .kwarg("electricity_cost", &input.electricity_cost)
            .kwarg("power_watts", &input.power_watts);

        self.cache
            .cached(&key, self.ttl.mining, || async {
                let (stats, price) =
                    tokio::join!(self.fetch_network_stats(), self.fetch_price());
                metrics::mining_profitability(
                    &input,
                    &self.mining,
                    stats,
                    price,
                    Utc::now(),
                )
            })
            .await
    }

    pub async fn top_whales(&self, limit: i64) -> Result<WhaleList, Error> {
        if limit <= 0 {
            return Ok(WhaleList {
                whales: Vec::new(),
                count: 0,
                computed_at: Utc::now(),
            });
        }
        if limit > MAX_WHALE_LIMIT {
            return Err(Error::InputValidation(format!(
                "limit must not exceed {}",
                MAX_WHALE_LIMIT
            )));
        }

        let limit = limit as usize;
        let key = CacheKey::new(cache_keys::WHALES, "top_whales")
            .kwarg("limit", &limit);

        self.cache
            .cached(&key, self.ttl.whales, || async {
                let entries = self.fetch_rich_list(limit).await;
                metrics::rank_whales(
                    entries,
                    limit,
                    &self.supply,
                    &self.labels,
                    Utc::now(),
                )
            })
            .await
    }

    pub async fn whale_statistics(&self) -> Result<WhaleStatistics, Error> {
        let key = CacheKey::new(cache_keys::WHALES, "whale_statistics");
        self.cache
            .cached(&key, self.ttl.whales, || async {
                let entries =
                    self.fetch_rich_list(WHALE_STATISTICS_DEPTH).await;
                metrics::whale_statistics(entries, &self.supply, Utc::now())
            })
            .await
    }

    pub async fn wallet(&self, address: &str) -> Result<WalletSnapshot, Error> {
        if !is_valid_address(address) {
            return Err(Error::InputValidation(format!(
                "malformed address '{}'",
                address
            )));
        }
        let address = address.to_lowercase();

        let key = CacheKey::new(cache_keys::WALLET, "wallet").arg(&address);
        self.cache
            .cached(&key, self.ttl.wallet, || async {
                let (balance, tx_count, price) = tokio::join!(
                    self.upstream.address_balance(&address),
                    self.upstream.address_tx_count(&address),
                    self.fetch_price()
                );

                let balance = balance.map_err(|e| {
                    if e.is_not_found() {
                        Error::NotFound(format!("address {}", address))
                    } else {
                        Error::UpstreamUnavailable(e)
                    }
                })?;
                let transaction_count = tx_count.unwrap_or_else(|e| {
                    warn!("Transaction count unavailable: {}", e);
                    None
                });
                let balance_usd = match price {
                    Ok(snapshot) => {
                        balance.to_f64().map(|kas| kas * snapshot.price)
                    },
                    Err(e) => {
                        warn!("Price unavailable for wallet valuation: {}", e);
                        None
                    },
                };

                Ok(WalletSnapshot {
                    address: address.clone(),
                    balance,
                    balance_usd,
                    transaction_count,
                    computed_at: Utc::now(),
                })
            })
            .await
    }

    pub async fn tokens(&self) -> Result<TokenList, Error> {
        let tokens = self.fetch_tokens().await?;
        Ok(TokenList {
            count: tokens.len(),
            tokens,
        })
    }

    pub async fn token(&self, symbol: &str) -> Result<TokenInfo, Error> {
        let symbol = symbol.trim();
        if symbol.is_empty()
            || symbol.len() > MAX_SYMBOL_LEN
            || !symbol.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::InputValidation(format!(
                "malformed token symbol '{}'",
                symbol
            )));
        }

        metrics::find_token(self.fetch_tokens().await?, symbol)
    }

    pub async fn trending_tokens(
        &self,
        limit: i64,
    ) -> Result<Vec<TokenInfo>, Error> {
        if !(1..=MAX_TRENDING_LIMIT).contains(&limit) {
            return Err(Error::InputValidation(format!(
                "limit must be between 1 and {}",
                MAX_TRENDING_LIMIT
            )));
        }

        let tokens = self.fetch_tokens().await?;
        Ok(metrics::trending_tokens(tokens, limit as usize))
    }

    pub async fn token_analytics(&self) -> Result<TokenAnalytics, Error> {
        let key = CacheKey::new(cache_keys::KRC20, "token_analytics");
        self.cache
            .cached(&key, self.ttl.tokens, || async {
                metrics::token_analytics(self.fetch_tokens().await, Utc::now())
            })
            .await
    }

    /// Administrative invalidation; `None` clears everything.
    pub async fn clear_cache(
        &self,
        pattern: Option<&str>,
    ) -> Result<usize, Error> {
        let pattern = pattern.filter(|p| !p.is_empty()).unwrap_or("*");
        self.cache
            .store()
            .clear(pattern)
            .await
            .map_err(|e| Error::CacheUnavailable(e.to_string()))
    }

    /// `None` when the store cannot be reached.
    pub async fn cache_entries(&self) -> Option<usize> {
        self.cache.store().entry_count().await.ok()
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("ttl", &self.ttl)
            .field("mining", &self.mining)
            .field("supply", &self.supply)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Mutex,
    };
    use async_trait::async_trait;

    use super::*;
    use crate::{
        cache::MemoryStore,
        error::{FailureKind, Provider, UpstreamError},
        helpers::ADDRESS_PREFIX,
        model::PricePoint,
    };

    #[derive(Default)]
    struct Calls {
        price: AtomicU32,
        history: AtomicU32,
        stats: AtomicU32,
        rich_list: AtomicU32,
        balance: AtomicU32,
        tokens: AtomicU32,
    }

    struct FakeUpstream {
        calls: Calls,
        price: Mutex<UpstreamResult<f64>>,
        stats: Mutex<UpstreamResult<NetworkStats>>,
        balance: UpstreamResult<BigDecimal>,
        tx_count: UpstreamResult<Option<u64>>,
        history: Vec<PricePoint>,
        rich_list: Vec<RichListEntry>,
        tokens: Vec<TokenInfo>,
    }

    fn failure(provider: Provider, kind: FailureKind) -> UpstreamError {
        UpstreamError::new(provider, kind, "fake failure")
    }

    impl FakeUpstream {
        fn new() -> Self {
            FakeUpstream {
                calls: Calls::default(),
                price: Mutex::new(Ok(0.05)),
                stats: Mutex::new(Ok(NetworkStats {
                    hashrate: Some(1e18),
                    blocks_per_second: Some(1.0),
                    node_count: Some(600),
                    orphan_rate: Some(0.0),
                    mempool_size: Some(0),
                    fetched_at: Utc::now(),
                    ..Default::default()
                })),
                balance: Ok(BigDecimal::from(1_000)),
                tx_count: Ok(Some(42)),
                history: Vec::new(),
                rich_list: Vec::new(),
                tokens: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Upstream for FakeUpstream {
        async fn price(&self) -> UpstreamResult<PriceSnapshot> {
            self.calls.price.fetch_add(1, Ordering::SeqCst);
            let price = self.price.lock().unwrap().clone()?;
            Ok(PriceSnapshot {
                price,
                change_24h: None,
                volume_24h: None,
                market_cap: None,
                computed_at: Utc::now(),
            })
        }

        async fn price_history(
            &self,
            _: &str,
        ) -> UpstreamResult<Vec<PricePoint>> {
            self.calls.history.fetch_add(1, Ordering::SeqCst);
            Ok(self.history.clone())
        }

        async fn network_stats(&self) -> UpstreamResult<NetworkStats> {
            self.calls.stats.fetch_add(1, Ordering::SeqCst);
            self.stats.lock().unwrap().clone()
        }

        async fn node_info(&self) -> UpstreamResult<NodeInfo> {
            Err(failure(Provider::Network, FailureKind::Timeout))
        }

        async fn blockdag(&self) -> UpstreamResult<BlockDagInfo> {
            Err(failure(Provider::Network, FailureKind::HttpStatus(502)))
        }

        async fn rich_list(
            &self,
            limit: usize,
        ) -> UpstreamResult<Vec<RichListEntry>> {
            self.calls.rich_list.fetch_add(1, Ordering::SeqCst);
            Ok(self.rich_list.iter().take(limit).cloned().collect())
        }

        async fn address_balance(
            &self,
            _: &str,
        ) -> UpstreamResult<BigDecimal> {
            self.calls.balance.fetch_add(1, Ordering::SeqCst);
            self.balance.clone()
        }

        async fn address_tx_count(
            &self,
            _: &str,
        ) -> UpstreamResult<Option<u64>> {
            self.tx_count.clone()
        }

        async fn token_list(&self) -> UpstreamResult<Vec<TokenInfo>> {
            self.calls.tokens.fetch_add(1, Ordering::SeqCst);
            Ok(self.tokens.clone())
        }
    }

    fn telemetry(upstream: Arc<FakeUpstream>) -> Telemetry {
        Telemetry::new(
            ResultCache::new(Arc::new(MemoryStore::new(256))),
            upstream,
            CacheTtl::default(),
            MiningParams {
                block_reward: 179.0,
                blocks_per_day: 86_400.0,
                watts_per_hash: 1e-9,
            },
            BigDecimal::from(1_000_000),
            HashMap::new(),
        )
    }

    fn address() -> String {
        format!("{}{}", ADDRESS_PREFIX, "q".repeat(61))
    }

    fn token(symbol: &str, volume: Option<f64>) -> TokenInfo {
        TokenInfo {
            symbol: symbol.to_owned(),
            name: None,
            max_supply: None,
            minted: None,
            holders: None,
            price: None,
            market_cap: None,
            volume_24h: volume,
            change_24h: None,
            state: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_price_cached_within_ttl_refetched_after() {
        let upstream = Arc::new(FakeUpstream::new());
        let service = telemetry(upstream.clone());

        let first = service.price().await.unwrap();
        let second = service.price().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.price, 0.05);
        assert_eq!(upstream.calls.price.load(Ordering::SeqCst), 1);

        tokio::time::advance(CacheTtl::default().price).await;

        service.price().await.unwrap();
        assert_eq!(upstream.calls.price.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_price_failure_not_cached() {
        let upstream = Arc::new(FakeUpstream::new());
        *upstream.price.lock().unwrap() =
            Err(failure(Provider::Price, FailureKind::HttpStatus(503)));
        let service = telemetry(upstream.clone());

        assert!(matches!(
            service.price().await,
            Err(Error::UpstreamUnavailable(_))
        ));

        *upstream.price.lock().unwrap() = Ok(0.07);
        assert_eq!(service.price().await.unwrap().price, 0.07);
        assert_eq!(upstream.calls.price.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_network_health_requires_stats() {
        let upstream = Arc::new(FakeUpstream::new());
        *upstream.stats.lock().unwrap() =
            Err(failure(Provider::Network, FailureKind::Transport));
        let service = telemetry(upstream.clone());

        let err = service.network_health().await.unwrap_err();
        assert!(matches!(err, Error::MissingRequiredInput { .. }));

        *upstream.stats.lock().unwrap() = Ok(NetworkStats {
            node_count: Some(600),
            ..Default::default()
        });
        let health = service.network_health().await.unwrap();
        assert_eq!(health.decentralization.score, Some(25.0));
        assert_eq!(health.overall_score, 25.0);
    }

    #[tokio::test]
    async fn test_mining_validates_before_fetching() {
        let upstream = Arc::new(FakeUpstream::new());
        let service = telemetry(upstream.clone());

        let err = service
            .mining(MiningInput {
                hashrate: 0.0,
                electricity_cost: 0.1,
                power_watts: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));
        assert_eq!(upstream.calls.stats.load(Ordering::SeqCst), 0);
        assert_eq!(upstream.calls.price.load(Ordering::SeqCst), 0);

        let result = service
            .mining(MiningInput {
                hashrate: 1e9,
                electricity_cost: 0.0,
                power_watts: None,
            })
            .await
            .unwrap();
        assert!((result.daily_yield - 1.54656e-2).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_whale_limits() {
        let mut fake = FakeUpstream::new();
        fake.rich_list = vec![
            RichListEntry {
                address: String::from("kaspa:qb"),
                balance: BigDecimal::from(10),
                tx_count: None,
            },
            RichListEntry {
                address: String::from("kaspa:qa"),
                balance: BigDecimal::from(20),
                tx_count: Some(3),
            },
        ];
        let upstream = Arc::new(fake);
        let service = telemetry(upstream.clone());

        assert!(service.top_whales(0).await.unwrap().whales.is_empty());
        assert!(service.top_whales(-3).await.unwrap().whales.is_empty());
        assert!(matches!(
            service.top_whales(101).await,
            Err(Error::InputValidation(_))
        ));
        assert_eq!(upstream.calls.rich_list.load(Ordering::SeqCst), 0);

        let list = service.top_whales(10).await.unwrap();
        assert_eq!(list.whales[0].address, "kaspa:qa");
        assert_eq!(list.whales[0].tx_count, Some(3));

        let stats = service.whale_statistics().await.unwrap();
        assert_eq!(stats.total_whales, 2);
        assert_eq!(stats.total_whale_balance, BigDecimal::from(30));
    }

    #[tokio::test]
    async fn test_wallet() {
        let upstream = Arc::new(FakeUpstream::new());
        let service = telemetry(upstream.clone());

        assert!(matches!(
            service.wallet("kaspa:tooshort").await,
            Err(Error::InputValidation(_))
        ));
        assert_eq!(upstream.calls.balance.load(Ordering::SeqCst), 0);

        let wallet = service.wallet(&address().to_uppercase()).await.unwrap();
        assert_eq!(wallet.address, address());
        assert_eq!(wallet.balance, BigDecimal::from(1_000));
        assert_eq!(wallet.balance_usd, Some(50.0));
        assert_eq!(wallet.transaction_count, Some(42));
    }

    #[tokio::test]
    async fn test_wallet_optional_inputs_and_not_found() {
        let mut fake = FakeUpstream::new();
        fake.tx_count = Err(failure(Provider::Explorer, FailureKind::Timeout));
        *fake.price.lock().unwrap() =
            Err(failure(Provider::Price, FailureKind::HttpStatus(429)));
        let service = telemetry(Arc::new(fake));

        let wallet = service.wallet(&address()).await.unwrap();
        assert_eq!(wallet.transaction_count, None);
        assert_eq!(wallet.balance_usd, None);

        let mut fake = FakeUpstream::new();
        fake.balance =
            Err(failure(Provider::Explorer, FailureKind::HttpStatus(404)));
        let service = telemetry(Arc::new(fake));
        assert!(matches!(
            service.wallet(&address()).await,
            Err(Error::NotFound(_))
        ));

        let mut fake = FakeUpstream::new();
        fake.balance =
            Err(failure(Provider::Explorer, FailureKind::HttpStatus(500)));
        let service = telemetry(Arc::new(fake));
        assert!(matches!(
            service.wallet(&address()).await,
            Err(Error::UpstreamUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_tokens() {
        let mut fake = FakeUpstream::new();
        fake.tokens = vec![
            token("NACHO", Some(10.0)),
            token("KASPY", Some(30.0)),
            token("ZEAL", None),
        ];
        let upstream = Arc::new(fake);
        let service = telemetry(upstream.clone());

        assert_eq!(service.tokens().await.unwrap().count, 3);
        assert_eq!(service.token("kaspy").await.unwrap().symbol, "KASPY");
        assert!(matches!(
            service.token("NOPE").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.token("../x").await,
            Err(Error::InputValidation(_))
        ));

        let trending = service.trending_tokens(2).await.unwrap();
        assert_eq!(trending[0].symbol, "KASPY");
        assert_eq!(trending.len(), 2);
        for limit in [0, 51] {
            assert!(matches!(
                service.trending_tokens(limit).await,
                Err(Error::InputValidation(_))
            ));
        }

        let analytics = service.token_analytics().await.unwrap();
        assert_eq!(analytics.total_volume_24h, 40.0);
        assert_eq!(upstream.calls.tokens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_price_history_keeps_recent_points() {
        let mut fake = FakeUpstream::new();
        fake.history = (0..5)
            .map(|i| PricePoint {
                timestamp: Utc::now() + chrono::Duration::minutes(i),
                price: i as f64,
            })
            .collect();
        let upstream = Arc::new(fake);
        let service = telemetry(upstream.clone());

        let history = service.price_history("1d", Some(2)).await.unwrap();
        assert_eq!(history.timeframe, Timeframe::OneDay);
        let prices: Vec<f64> = history.prices.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![3.0, 4.0]);

        assert_eq!(
            service.price_history("1D", None).await.unwrap().prices.len(),
            5
        );

        let invalid = [("2Y", None), ("1D", Some(0)), ("1D", Some(1001))];
        for (timeframe, limit) in invalid {
            assert!(matches!(
                service.price_history(timeframe, limit).await,
                Err(Error::InputValidation(_))
            ));
        }
        assert_eq!(upstream.calls.history.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_blockdag_failure_is_upstream_unavailable() {
        let service = telemetry(Arc::new(FakeUpstream::new()));
        assert!(matches!(
            service.blockdag().await,
            Err(Error::UpstreamUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let upstream = Arc::new(FakeUpstream::new());
        let service = telemetry(upstream.clone());

        service.price().await.unwrap();
        service.network_stats().await.unwrap();
        assert_eq!(service.cache_entries().await, Some(2));

        assert_eq!(service.clear_cache(Some("price*")).await.unwrap(), 1);
        service.price().await.unwrap();
        assert_eq!(upstream.calls.price.load(Ordering::SeqCst), 2);

        assert_eq!(service.clear_cache(None).await.unwrap(), 2);
        assert_eq!(service.cache_entries().await, Some(0));
    }
}
