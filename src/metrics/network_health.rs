use chrono::{DateTime, Utc};

use crate::{
    error::{Error, UpstreamResult},
    helpers::round_to,
    model::{HealthStatus, NetworkHealth, NetworkStats, NodeInfo, SubScore},
};

const METRIC: &str = "network_health";

pub const SUB_SCORE_MAX: f64 = 25.0;
pub const TARGET_NODES: f64 = 600.0;
/// 900 PH/s.
pub const TARGET_HASHRATE: f64 = 9e17;
pub const TARGET_BLOCKS_PER_SECOND: f64 = 1.0;
pub const ORPHAN_RATE_CEILING: f64 = 0.20;
pub const MEMPOOL_CEILING: f64 = 10_000.0;

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, SUB_SCORE_MAX)
}

fn sub_score(score: Option<f64>) -> SubScore {
    let score = score.map(|s| round_to(clamp_score(s), 2));
    SubScore {
        score,
        status: score.map(|s| HealthStatus::from_score(s * 4.0)),
    }
}

/// Network stats are required. Node info only backs up the mempool size
/// when the stats snapshot lacks it.
pub fn network_health(
    stats: UpstreamResult<NetworkStats>,
    node_info: UpstreamResult<NodeInfo>,
    now: DateTime<Utc>,
) -> Result<NetworkHealth, Error> {
    let stats = stats
        .map_err(|e| Error::missing_input(METRIC, "network_stats", e))?;

    let mut missing_inputs = Vec::new();
    let mut present = |name: &str, value: Option<f64>| {
        if value.is_none() {
            missing_inputs.push(name.to_owned());
        }
        value
    };

    let decentralization = present(
        "node_count",
        stats.node_count.map(|nodes| {
            SUB_SCORE_MAX * nodes as f64 / TARGET_NODES
        }),
    );
    let security = present(
        "hashrate",
        stats.hashrate.map(|h| SUB_SCORE_MAX * h / TARGET_HASHRATE),
    );
    let speed = present(
        "blocks_per_second",
        stats
            .blocks_per_second
            .map(|bps| SUB_SCORE_MAX * bps / TARGET_BLOCKS_PER_SECOND),
    );

    let mempool = stats
        .mempool_size
        .or_else(|| node_info.ok().and_then(|info| info.mempool_size));
    let orphan_component = present(
        "orphan_rate",
        stats.orphan_rate.map(|rate| {
            clamp_score(SUB_SCORE_MAX * (1.0 - rate / ORPHAN_RATE_CEILING))
        }),
    );
    let mempool_component = present(
        "mempool_size",
        mempool.map(|size| {
            clamp_score(SUB_SCORE_MAX * (1.0 - size as f64 / MEMPOOL_CEILING))
        }),
    );
    let components: Vec<f64> =
        [orphan_component, mempool_component].into_iter().flatten().collect();
    let stability = if components.is_empty() {
        None
    } else {
        Some(components.iter().sum::<f64>() / components.len() as f64)
    };

    let decentralization = sub_score(decentralization);
    let security = sub_score(security);
    let speed = sub_score(speed);
    let stability = sub_score(stability);

    let overall_score = round_to(
        [decentralization, security, speed, stability]
            .iter()
            .filter_map(|s| s.score)
            .sum::<f64>()
            .clamp(0.0, 4.0 * SUB_SCORE_MAX),
        2,
    );

    Ok(NetworkHealth {
        overall_score,
        status: HealthStatus::from_score(overall_score),
        decentralization,
        security,
        speed,
        stability,
        missing_inputs,
        computed_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, Provider, UpstreamError};

    fn full_stats() -> NetworkStats {
        NetworkStats {
            hashrate: Some(9e17),
            blocks_per_second: Some(1.0),
            node_count: Some(600),
            orphan_rate: Some(0.0),
            mempool_size: Some(0),
            fetched_at: Utc::now(),
            ..Default::default()
        }
    }

    fn node_down() -> UpstreamResult<NodeInfo> {
        Err(UpstreamError::new(
            Provider::Network,
            FailureKind::Timeout,
            "no response",
        ))
    }

    #[test]
    fn test_perfect_network_scores_100() {
        let health = network_health(Ok(full_stats()), node_down(), Utc::now())
            .unwrap();

        assert_eq!(health.overall_score, 100.0);
        assert_eq!(health.status, HealthStatus::Excellent);
        assert_eq!(health.speed.score, Some(25.0));
        assert!(health.missing_inputs.is_empty());
    }

    #[test]
    fn test_sub_scores_clamped() {
        let stats = NetworkStats {
            hashrate: Some(5e18),
            blocks_per_second: Some(10.0),
            node_count: Some(100_000),
            orphan_rate: Some(0.9),
            mempool_size: Some(50_000),
            ..full_stats()
        };
        let health = network_health(Ok(stats), node_down(), Utc::now())
            .unwrap();

        assert_eq!(health.security.score, Some(25.0));
        assert_eq!(health.speed.score, Some(25.0));
        assert_eq!(health.decentralization.score, Some(25.0));
        assert_eq!(health.stability.score, Some(0.0));
        assert_eq!(health.stability.status, Some(HealthStatus::Poor));
        assert_eq!(health.overall_score, 75.0);
        assert_eq!(health.status, HealthStatus::Good);
    }

    #[test]
    fn test_failed_stats_fail_the_metric() {
        let failed = Err(UpstreamError::new(
            Provider::Network,
            FailureKind::HttpStatus(503),
            "unavailable",
        ));
        let node = Ok(NodeInfo {
            mempool_size: Some(10),
            is_synced: Some(true),
            server_version: None,
        });

        let err = network_health(failed, node, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredInput {
                metric: "network_health",
                input: "network_stats",
                ..
            }
        ));
    }

    #[test]
    fn test_absent_fields_are_null_not_zero_filled() {
        let stats = NetworkStats {
            hashrate: None,
            orphan_rate: None,
            mempool_size: None,
            ..full_stats()
        };
        let health = network_health(Ok(stats), node_down(), Utc::now())
            .unwrap();

        assert_eq!(health.security.score, None);
        assert_eq!(health.security.status, None);
        assert_eq!(health.stability.score, None);
        assert_eq!(health.overall_score, 50.0);
        assert_eq!(
            health.missing_inputs,
            vec!["hashrate", "orphan_rate", "mempool_size"]
        );
    }

    #[test]
    fn test_node_info_supplies_mempool() {
        let stats = NetworkStats {
            orphan_rate: None,
            mempool_size: None,
            ..full_stats()
        };
        let node = Ok(NodeInfo {
            mempool_size: Some(5_000),
            is_synced: Some(true),
            server_version: None,
        });
        let health = network_health(Ok(stats), node, Utc::now()).unwrap();

        assert_eq!(health.stability.score, Some(12.5));
        assert_eq!(health.missing_inputs, vec!["orphan_rate"]);
    }

    #[test]
    fn test_stability_averages_available_components() {
        let stats = NetworkStats {
            orphan_rate: Some(0.1),
            mempool_size: Some(0),
            ..full_stats()
        };
        let health = network_health(Ok(stats), node_down(), Utc::now())
            .unwrap();

        assert_eq!(health.stability.score, Some(18.75));
    }
}
