use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::Upstream;
use crate::{
    configuration::Config,
    error::{Error, FailureKind, Provider, UpstreamError, UpstreamResult},
    model::{
        BlockDagInfo, NetworkStats, NodeInfo, PricePoint, PriceSnapshot,
        RichListEntry, TokenInfo,
    },
    types::{
        AddressBalance, AddressTxCount, BlockDagBody, CoinGeckoMarketData,
        CoinGeckoPrice, CoinGeckoSimplePrice, KaspadInfo, KasplexTokenList,
        NetworkStatsBody, RichListItem,
    },
};

const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 250;
const DEFAULT_MAX_DELAY_MS: u64 = 4_000;

/// Bounded exponential backoff for idempotent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: DEFAULT_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(
        attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        RetryPolicy {
            attempts: attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    /// Only GET is retried.
    pub fn attempts_for(&self, method: &Method) -> u32 {
        if *method == Method::GET {
            self.attempts
        } else {
            1
        }
    }

    /// Delay before the retry that follows failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    pub fn is_retryable_status(status: StatusCode) -> bool {
        matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
    }
}

/// One failed attempt, tagged with whether trying again may help.
struct Attempt {
    error: UpstreamError,
    retryable: bool,
}

fn classify(provider: Provider, err: reqwest::Error) -> Attempt {
    if err.is_timeout() {
        return Attempt {
            error: UpstreamError::new(
                provider,
                FailureKind::Timeout,
                err.to_string(),
            ),
            retryable: false,
        };
    }

    if err.is_decode() {
        return Attempt {
            error: UpstreamError::decode(provider, err.to_string()),
            retryable: false,
        };
    }

    Attempt {
        retryable: err.is_connect(),
        error: UpstreamError::new(
            provider,
            FailureKind::Transport,
            err.to_string(),
        ),
    }
}

/// reqwest client for every upstream provider.
#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: &Config) -> Result<HTTP, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                "kasmetrics/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .default_headers(headers)
            .build()?;

        Ok(HTTP {
            config: config.clone(),
            http,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: Provider,
        url: Url,
    ) -> UpstreamResult<T> {
        self.request_json(provider, Method::GET, url).await
    }

    pub async fn request_json<T: DeserializeOwned>(
        &self,
        provider: Provider,
        method: Method,
        url: Url,
    ) -> UpstreamResult<T> {
        let policy = self.config.retry;
        let attempts = policy.attempts_for(&method);
        let mut attempt = 1;

        loop {
            let result =
                self.send_once(provider, method.clone(), url.clone()).await;
            match result {
                Ok(value) => return Ok(value),
                Err(failed) if failed.retryable && attempt < attempts => {
                    let delay = policy.backoff(attempt);
                    warn!(
                        "{} {} attempt {}/{} failed, retrying in {:?}: {}",
                        method,
                        url.path(),
                        attempt,
                        attempts,
                        delay,
                        failed.error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                Err(failed) => return Err(failed.error),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        provider: Provider,
        method: Method,
        url: Url,
    ) -> Result<T, Attempt> {
        debug!("{} {}", method, url.path());

        let response = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(|e| classify(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Attempt {
                error: UpstreamError::new(
                    provider,
                    FailureKind::HttpStatus(status.as_u16()),
                    status.canonical_reason().unwrap_or("unexpected status"),
                ),
                retryable: RetryPolicy::is_retryable_status(status),
            });
        }

        let body =
            response.bytes().await.map_err(|e| classify(provider, e))?;

        serde_json::from_slice::<T>(&body).map_err(|e| Attempt {
            error: UpstreamError::decode(provider, e.to_string()),
            retryable: false,
        })
    }
}

#[async_trait]
impl Upstream for HTTP {
    async fn price(&self) -> UpstreamResult<PriceSnapshot> {
        let body: CoinGeckoPrice = self
            .get_json(Provider::Price, self.config.get_price_url())
            .await?;
        CoinGeckoSimplePrice::from_body(body)?.into_snapshot(Utc::now())
    }

    async fn price_history(
        &self,
        days: &str,
    ) -> UpstreamResult<Vec<PricePoint>> {
        let body: CoinGeckoMarketData = self
            .get_json(Provider::Price, self.config.get_price_history_url(days))
            .await?;
        body.into_points()
    }

    async fn network_stats(&self) -> UpstreamResult<NetworkStats> {
        let body: NetworkStatsBody = self
            .get_json(Provider::Network, self.config.get_network_stats_url())
            .await?;
        Ok(body.into_stats(Utc::now()))
    }

    async fn node_info(&self) -> UpstreamResult<NodeInfo> {
        let body: KaspadInfo = self
            .get_json(Provider::Network, self.config.get_node_info_url())
            .await?;
        Ok(NodeInfo::from(body))
    }

    async fn blockdag(&self) -> UpstreamResult<BlockDagInfo> {
        let body: BlockDagBody = self
            .get_json(Provider::Network, self.config.get_blockdag_url())
            .await?;
        Ok(body.into_info(Utc::now()))
    }

    async fn rich_list(
        &self,
        limit: usize,
    ) -> UpstreamResult<Vec<RichListEntry>> {
        let items: Vec<RichListItem> = self
            .get_json(Provider::Explorer, self.config.get_rich_list_url(limit))
            .await?;
        items.into_iter().map(RichListItem::into_entry).collect()
    }

    async fn address_balance(
        &self,
        address: &str,
    ) -> UpstreamResult<BigDecimal> {
        let body: AddressBalance = self
            .get_json(
                Provider::Explorer,
                self.config.get_address_balance_url(address),
            )
            .await?;
        body.into_kas()
    }

    async fn address_tx_count(
        &self,
        address: &str,
    ) -> UpstreamResult<Option<u64>> {
        let body: AddressTxCount = self
            .get_json(
                Provider::Explorer,
                self.config.get_address_tx_count_url(address),
            )
            .await?;
        Ok(body.total)
    }

    async fn token_list(&self) -> UpstreamResult<Vec<TokenInfo>> {
        let body: KasplexTokenList = self
            .get_json(Provider::Tokens, self.config.get_token_list_url())
            .await?;
        body.into_tokens()
    }
}
