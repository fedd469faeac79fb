//! Derived metrics.
//!
//! Every function here is a pure fold over upstream outcomes that the caller
//! already fetched. A failed required input fails the whole metric with
//! [`Error::MissingRequiredInput`](crate::error::Error); optional inputs only
//! reduce precision.

pub use self::{
    mining::mining_profitability,
    network_health::network_health,
    tokens::{find_token, token_analytics, trending_tokens},
    whales::{rank_whales, whale_statistics},
};

mod mining;
mod network_health;
mod tokens;
mod whales;
