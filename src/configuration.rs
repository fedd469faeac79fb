use std::{
    collections::HashMap, env, fs, ops::Deref, path::Path, str::FromStr,
    sync::Arc, time::Duration,
};

use bigdecimal::{BigDecimal, Zero};
use url::Url;

use crate::{
    cache::MemoryStore,
    error::Error,
    helpers::parse_address_labels,
    model::MiningParams,
    provider::{RetryPolicy, Upstream, HTTP},
    rate_limit::RateLimiter,
    result_cache::ResultCache,
    service::Telemetry,
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub telemetry: Telemetry,
    pub rate_limiter: RateLimiter,
}

impl State {
    pub fn new(config: Config) -> Result<State, Error> {
        let http = HTTP::new(&config)?;
        Ok(Self::with_upstream(config, Arc::new(http)))
    }

    pub fn with_upstream(
        config: Config,
        upstream: Arc<dyn Upstream>,
    ) -> State {
        let store = Arc::new(MemoryStore::new(config.cache_max_entries));
        let telemetry = Telemetry::new(
            ResultCache::new(store),
            upstream,
            config.cache_ttl.clone(),
            config.mining,
            config.circulating_supply.clone(),
            config.known_addresses.clone(),
        );
        let rate_limiter = RateLimiter::new(
            config.rate_limit_per_minute,
            config.rate_limit_per_hour,
        );

        Self {
            config,
            telemetry,
            rate_limiter,
        }
    }
}

/// Per-namespace time to live. `Duration::ZERO` disables caching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTtl {
    pub price: Duration,
    pub price_history: Duration,
    pub network_stats: Duration,
    pub network_health: Duration,
    pub blockdag: Duration,
    pub whales: Duration,
    pub wallet: Duration,
    pub tokens: Duration,
    pub mining: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        CacheTtl {
            price: Duration::from_secs(15),
            price_history: Duration::from_secs(300),
            network_stats: Duration::from_secs(10),
            network_health: Duration::from_secs(30),
            blockdag: Duration::from_secs(5),
            whales: Duration::from_secs(300),
            wallet: Duration::from_secs(60),
            tokens: Duration::from_secs(60),
            mining: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
    pub timeout: u64,
    pub retry: RetryPolicy,
    pub kaspa_api_url: Url,
    pub kaspa_explorer_api: Url,
    pub krc20_api_url: Url,
    pub coingecko_api_url: Url,
    pub coingecko_api_key: Option<String>,
    pub cache_ttl: CacheTtl,
    pub cache_max_entries: usize,
    pub cache_sweep_interval: u64,
    pub rate_limit_per_minute: u32,
    pub rate_limit_per_hour: u32,
    pub mining: MiningParams,
    pub circulating_supply: BigDecimal,
    pub known_addresses: HashMap<String, String>,
}

impl Config {
    pub fn get_price_url(&self) -> Url {
        let mut url = endpoint(&self.coingecko_api_url, &["simple", "price"]);
        url.query_pairs_mut()
            .append_pair("ids", "kaspa")
            .append_pair("vs_currencies", "usd")
            .append_pair("include_24hr_change", "true")
            .append_pair("include_24hr_vol", "true")
            .append_pair("include_market_cap", "true");
        self.with_coingecko_key(url)
    }

    pub fn get_price_history_url(&self, days: &str) -> Url {
        let mut url = endpoint(
            &self.coingecko_api_url,
            &["coins", "kaspa", "market_chart"],
        );
        url.query_pairs_mut()
            .append_pair("vs_currency", "usd")
            .append_pair("days", days);
        self.with_coingecko_key(url)
    }

    pub fn get_network_stats_url(&self) -> Url {
        endpoint(&self.kaspa_api_url, &["info", "network"])
    }

    pub fn get_node_info_url(&self) -> Url {
        endpoint(&self.kaspa_api_url, &["info", "kaspad"])
    }

    pub fn get_blockdag_url(&self) -> Url {
        endpoint(&self.kaspa_api_url, &["info", "blockdag"])
    }

    pub fn get_rich_list_url(&self, limit: usize) -> Url {
        let mut url = endpoint(&self.kaspa_explorer_api, &["addresses", "top"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        url
    }

    pub fn get_address_balance_url(&self, address: &str) -> Url {
        endpoint(&self.kaspa_explorer_api, &["addresses", address, "balance"])
    }

    pub fn get_address_tx_count_url(&self, address: &str) -> Url {
        endpoint(
            &self.kaspa_explorer_api,
            &["addresses", address, "transactions-count"],
        )
    }

    pub fn get_token_list_url(&self) -> Url {
        endpoint(&self.krc20_api_url, &["krc20", "tokenlist"])
    }

    fn with_coingecko_key(&self, mut url: Url) -> Url {
        if let Some(key) = &self.coingecko_api_key {
            url.query_pairs_mut().append_pair("x_cg_demo_api_key", key);
        }
        url
    }
}

/// Appends percent-encoded path segments to a base url.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub fn get_configuration() -> Result<Config, Error> {
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect::<Vec<String>>();
    let log_level = env::var("LOG_LEVEL").unwrap_or(String::from("info"));
    let timeout: u64 = env::var("TIMEOUT")?.parse()?;

    let retry = RetryPolicy::new(
        env::var("RETRY_ATTEMPTS")?.parse()?,
        Duration::from_millis(env::var("RETRY_BASE_DELAY_MS")?.parse()?),
        Duration::from_millis(env::var("RETRY_MAX_DELAY_MS")?.parse()?),
    );

    let kaspa_api_url = get_url("KASPA_API_URL")?;
    let kaspa_explorer_api = get_url("KASPA_EXPLORER_API")?;
    let krc20_api_url = get_url("KRC20_API_URL")?;
    let coingecko_api_url = get_url("COINGECKO_API_URL")?;
    let coingecko_api_key = env::var("COINGECKO_API_KEY")
        .ok()
        .map(|key| key.trim().to_owned())
        .filter(|key| !key.is_empty());

    let cache_ttl = CacheTtl {
        price: get_ttl("CACHE_TTL_PRICE")?,
        price_history: get_ttl("CACHE_TTL_PRICE_HISTORY")?,
        network_stats: get_ttl("CACHE_TTL_NETWORK_STATS")?,
        network_health: get_ttl("CACHE_TTL_NETWORK_HEALTH")?,
        blockdag: get_ttl("CACHE_TTL_BLOCKDAG")?,
        whales: get_ttl("CACHE_TTL_WHALES")?,
        wallet: get_ttl("CACHE_TTL_WALLET")?,
        tokens: get_ttl("CACHE_TTL_TOKENS")?,
        mining: get_ttl("CACHE_TTL_MINING")?,
    };
    let cache_max_entries: usize = env::var("CACHE_MAX_ENTRIES")?.parse()?;
    let cache_sweep_interval: u64 =
        env::var("CACHE_SWEEP_INTERVAL")?.parse()?;

    let rate_limit_per_minute: u32 =
        env::var("RATE_LIMIT_PER_MINUTE")?.parse()?;
    let rate_limit_per_hour: u32 = env::var("RATE_LIMIT_PER_HOUR")?.parse()?;

    let mining = MiningParams {
        block_reward: get_positive("BLOCK_REWARD")?,
        blocks_per_day: get_positive("BLOCKS_PER_DAY")?,
        watts_per_hash: get_positive("WATTS_PER_HASH")?,
    };
    let circulating_supply =
        parse_supply(&env::var("CIRCULATING_SUPPLY")?)?;
    let known_addresses =
        parse_address_labels(env::var("KNOWN_ADDRESSES").unwrap_or_default());

    if cache_sweep_interval == 0 {
        return Err(Error::ConfigurationError(String::from(
            "CACHE_SWEEP_INTERVAL must be greater than 0",
        )));
    }

    let config = Config {
        server_host,
        port,
        allowed_origins,
        log_level,
        timeout,
        retry,
        kaspa_api_url,
        kaspa_explorer_api,
        krc20_api_url,
        coingecko_api_url,
        coingecko_api_key,
        cache_ttl,
        cache_max_entries,
        cache_sweep_interval,
        rate_limit_per_minute,
        rate_limit_per_hour,
        mining,
        circulating_supply,
        known_addresses,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = "kasmetrics.conf";
    let secrets_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);
    let secrets_path = format!("{}/{}", directory, secrets_file);

    let config_string = fs::read_to_string(path)?;
    for (key, value) in parse_config_string(&config_string) {
        env::set_var(key, value);
    }

    if Path::new(&secrets_path).exists() {
        let secrets_string = fs::read_to_string(secrets_path)?;
        for (key, value) in parse_config_string(&secrets_string) {
            env::set_var(key, value);
        }
    }

    Ok(())
}

/// `KEY=value` pairs; blank lines, comments and lines without `=` are
/// skipped.
fn parse_config_string(config: &str) -> Vec<(String, String)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn get_url(key: &str) -> Result<Url, Error> {
    let url = Url::parse(&env::var(key)?)?;
    if url.cannot_be_a_base() {
        return Err(Error::ConfigurationError(format!(
            "{} is not a base url",
            key
        )));
    }
    Ok(url)
}

fn get_ttl(key: &str) -> Result<Duration, Error> {
    let seconds: i64 = env::var(key)?.parse()?;
    Ok(ttl_from_secs(seconds))
}

/// Signed seconds, non-positive values disable caching.
fn ttl_from_secs(seconds: i64) -> Duration {
    u64::try_from(seconds)
        .map(Duration::from_secs)
        .unwrap_or(Duration::ZERO)
}

fn get_positive(key: &str) -> Result<f64, Error> {
    let value: f64 = env::var(key)?.parse()?;
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::ConfigurationError(format!(
            "{} must be a positive number",
            key
        )));
    }
    Ok(value)
}

/// Circulating supply in KAS, kept exact for percentage math.
pub fn parse_supply(value: &str) -> Result<BigDecimal, Error> {
    let supply = BigDecimal::from_str(value.trim()).map_err(|_| {
        Error::ConfigurationError(format!(
            "CIRCULATING_SUPPLY is not a number: {:?}",
            value
        ))
    })?;
    if supply <= BigDecimal::zero() {
        return Err(Error::ConfigurationError(String::from(
            "CIRCULATING_SUPPLY must be a positive number",
        )));
    }
    Ok(supply)
}
