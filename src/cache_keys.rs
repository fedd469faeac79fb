//! Cache namespaces and deterministic key derivation
//!
//! Every cached call is identified by `namespace:fetcher`, followed by a
//! digest of its arguments when it has any. Namespaces double as the
//! prefix used for administrative invalidation (`price*`, `whales:*`).

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

// Price endpoints
pub const PRICE: &str = "price";
pub const PRICE_HISTORY: &str = "price_history";

// Network endpoints
pub const NETWORK_STATS: &str = "network_stats";
pub const NODE_INFO: &str = "node_info";
pub const NETWORK_HEALTH: &str = "network_health";
pub const BLOCKDAG: &str = "blockdag";

// Derived endpoints
pub const MINING: &str = "mining";
pub const WHALES: &str = "whales";
pub const WALLET: &str = "wallet";
pub const KRC20: &str = "krc20";

/// Identity of one cached call.
#[derive(Debug, Clone)]
pub struct CacheKey {
    namespace: &'static str,
    fetcher: &'static str,
    args: Vec<String>,
    kwargs: BTreeMap<String, String>,
    cacheable: bool,
}

impl CacheKey {
    pub fn new(namespace: &'static str, fetcher: &'static str) -> Self {
        CacheKey {
            namespace,
            fetcher,
            args: Vec::new(),
            kwargs: BTreeMap::new(),
            cacheable: true,
        }
    }

    /// Positional argument; position is significant.
    pub fn arg<A: Serialize + ?Sized>(mut self, value: &A) -> Self {
        match canonical(value) {
            Some(encoded) => self.args.push(encoded),
            None => self.mark_uncacheable("positional argument"),
        }
        self
    }

    /// Keyword argument; insertion order is irrelevant.
    pub fn kwarg<A: Serialize + ?Sized>(
        mut self,
        name: &str,
        value: &A,
    ) -> Self {
        match canonical(value) {
            Some(encoded) => {
                self.kwargs.insert(name.to_owned(), encoded);
            },
            None => self.mark_uncacheable(name),
        }
        self
    }

    /// Positional argument drawn from an unordered collection
    /// (`HashSet`, `HashMap` values, ...). Elements are sorted by their
    /// canonical form so iteration order never leaks into the key.
    pub fn unordered_arg<I, A>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Serialize,
    {
        let mut encoded = Vec::new();
        for value in values {
            match canonical(&value) {
                Some(item) => encoded.push(item),
                None => {
                    self.mark_uncacheable("unordered argument");
                    return self;
                },
            }
        }
        encoded.sort();
        self.args.push(format!("{{{}}}", encoded.join(",")));
        self
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// `false` when an argument could not be serialized; such calls bypass
    /// the cache entirely.
    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    fn mark_uncacheable(&mut self, what: &str) {
        warn!(
            "{}:{} {} is not serializable, call will not be cached",
            self.namespace, self.fetcher, what
        );
        self.cacheable = false;
    }

    fn digest(&self) -> Option<String> {
        if self.args.is_empty() && self.kwargs.is_empty() {
            return None;
        }

        let mut material = String::from("[");
        material.push_str(&self.args.join(","));
        material.push_str("]{");
        let kwargs = self
            .kwargs
            .iter()
            .map(|(name, value)| format!("{:?}:{}", name, value))
            .collect::<Vec<String>>();
        material.push_str(&kwargs.join(","));
        material.push('}');

        Some(sha256::digest(material))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.fetcher)?;
        if let Some(digest) = self.digest() {
            write!(f, ":{}", digest)?;
        }
        Ok(())
    }
}

fn canonical<A: Serialize + ?Sized>(value: &A) -> Option<String> {
    let value = serde_json::to_value(value).ok()?;
    let mut out = String::new();
    write_canonical(&value, &mut out).ok()?;
    Some(out)
}

/// JSON with object keys sorted at every depth and `-0.0` folded into `0`.
fn write_canonical(value: &Value, out: &mut String) -> fmt::Result {
    match value {
        Value::Null => out.write_str("null"),
        Value::Bool(b) => write!(out, "{}", b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => out.write_str("0"),
            _ => write!(out, "{}", n),
        },
        Value::String(s) => write!(out, "{:?}", s),
        Value::Array(items) => {
            out.write_char('[')?;
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.write_char(',')?;
                }
                write_canonical(item, out)?;
            }
            out.write_char(']')
        },
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.write_char('{')?;
            for (index, key) in keys.into_iter().enumerate() {
                if index > 0 {
                    out.write_char(',')?;
                }
                write!(out, "{:?}:", key)?;
                write_canonical(&map[key], out)?;
            }
            out.write_char('}')
        },
    }
}
