pub mod cache;
pub mod cache_keys;
pub mod configuration;
pub mod controller;
pub mod error;
pub mod handler;
pub mod helpers;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod rate_limit;
pub mod result_cache;
pub mod server;
pub mod service;
pub mod types;
