use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::{
    error::{Error, UpstreamResult},
    model::{TokenAnalytics, TokenInfo},
};

/// First token whose `field` is strictly better than every earlier one.
fn select_by<F>(
    tokens: &[TokenInfo],
    field: F,
    better: Ordering,
) -> Option<TokenInfo>
where
    F: Fn(&TokenInfo) -> Option<f64>,
{
    let mut best: Option<(&TokenInfo, f64)> = None;
    for token in tokens {
        if let Some(value) = field(token) {
            match best {
                Some((_, current)) if value.total_cmp(&current) != better => {},
                _ => best = Some((token, value)),
            }
        }
    }
    best.map(|(token, _)| token.clone())
}

pub fn token_analytics(
    tokens: UpstreamResult<Vec<TokenInfo>>,
    now: DateTime<Utc>,
) -> Result<TokenAnalytics, Error> {
    let tokens = tokens
        .map_err(|e| Error::missing_input("token_analytics", "token_list", e))?;

    let total_market_cap =
        tokens.iter().filter_map(|t| t.market_cap).sum::<f64>();
    let tokens_with_market_data =
        tokens.iter().filter(|t| t.market_cap.is_some()).count();
    let total_volume_24h =
        tokens.iter().filter_map(|t| t.volume_24h).sum::<f64>();
    let total_holders = tokens
        .iter()
        .filter_map(|t| t.holders)
        .fold(0u64, u64::saturating_add);

    let changes: Vec<f64> = tokens.iter().filter_map(|t| t.change_24h).collect();
    let average_change_24h = if changes.is_empty() {
        0.0
    } else {
        changes.iter().sum::<f64>() / changes.len() as f64
    };
    let gainers_count = changes.iter().filter(|c| **c > 0.0).count();
    let losers_count = changes.iter().filter(|c| **c < 0.0).count();

    Ok(TokenAnalytics {
        total_tokens: tokens.len(),
        tokens_with_market_data,
        total_market_cap,
        total_volume_24h,
        total_holders,
        average_change_24h,
        gainers_count,
        losers_count,
        top_gainer: select_by(&tokens, |t| t.change_24h, Ordering::Greater),
        top_loser: select_by(&tokens, |t| t.change_24h, Ordering::Less),
        highest_volume: select_by(&tokens, |t| t.volume_24h, Ordering::Greater),
        computed_at: now,
    })
}

/// Case-insensitive symbol lookup.
pub fn find_token(
    tokens: Vec<TokenInfo>,
    symbol: &str,
) -> Result<TokenInfo, Error> {
    tokens
        .into_iter()
        .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
        .ok_or_else(|| Error::NotFound(format!("token {}", symbol)))
}

/// Highest 24h volume first; tokens without volume keep their order at
/// the end.
pub fn trending_tokens(
    mut tokens: Vec<TokenInfo>,
    limit: usize,
) -> Vec<TokenInfo> {
    tokens.sort_by(|a, b| match (a.volume_24h, b.volume_24h) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    tokens.truncate(limit);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, Provider, UpstreamError};

    fn token(
        symbol: &str,
        change: Option<f64>,
        volume: Option<f64>,
    ) -> TokenInfo {
        TokenInfo {
            symbol: symbol.to_owned(),
            name: None,
            max_supply: None,
            minted: None,
            holders: None,
            price: None,
            market_cap: None,
            volume_24h: volume,
            change_24h: change,
            state: None,
        }
    }

    #[test]
    fn test_empty_list() {
        let analytics = token_analytics(Ok(Vec::new()), Utc::now()).unwrap();

        assert_eq!(analytics.total_tokens, 0);
        assert_eq!(analytics.average_change_24h, 0.0);
        assert!(analytics.top_gainer.is_none());
        assert!(analytics.top_loser.is_none());
        assert!(analytics.highest_volume.is_none());
    }

    #[test]
    fn test_totals_and_selection() {
        let mut nacho = token("NACHO", Some(12.0), Some(500.0));
        nacho.market_cap = Some(1_000.0);
        nacho.holders = Some(10);
        let mut kaspy = token("KASPY", Some(-4.0), Some(900.0));
        kaspy.holders = Some(5);
        let zeal = token("ZEAL", None, None);

        let analytics =
            token_analytics(Ok(vec![nacho, kaspy, zeal]), Utc::now()).unwrap();

        assert_eq!(analytics.total_tokens, 3);
        assert_eq!(analytics.tokens_with_market_data, 1);
        assert_eq!(analytics.total_market_cap, 1_000.0);
        assert_eq!(analytics.total_volume_24h, 1_400.0);
        assert_eq!(analytics.total_holders, 15);
        assert_eq!(analytics.average_change_24h, 4.0);
        assert_eq!(analytics.gainers_count, 1);
        assert_eq!(analytics.losers_count, 1);
        assert_eq!(analytics.top_gainer.unwrap().symbol, "NACHO");
        assert_eq!(analytics.top_loser.unwrap().symbol, "KASPY");
        assert_eq!(analytics.highest_volume.unwrap().symbol, "KASPY");
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let tokens = vec![
            token("FIRST", Some(5.0), Some(10.0)),
            token("SECOND", Some(5.0), Some(10.0)),
        ];
        let analytics = token_analytics(Ok(tokens), Utc::now()).unwrap();

        assert_eq!(analytics.top_gainer.unwrap().symbol, "FIRST");
        assert_eq!(analytics.top_loser.unwrap().symbol, "FIRST");
        assert_eq!(analytics.highest_volume.unwrap().symbol, "FIRST");
    }

    #[test]
    fn test_failed_list_is_missing_input() {
        let failed = Err(UpstreamError::decode(Provider::Tokens, "bad body"));
        let err = token_analytics(failed, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredInput { input: "token_list", .. }
        ));
    }

    #[test]
    fn test_find_token_case_insensitive() {
        let tokens = vec![token("NACHO", None, None), token("KASPY", None, None)];
        assert_eq!(find_token(tokens.clone(), "nacho").unwrap().symbol, "NACHO");
        assert!(matches!(
            find_token(tokens, "XYZ"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_trending_order() {
        let tokens = vec![
            token("A", None, None),
            token("B", None, Some(10.0)),
            token("C", None, Some(30.0)),
            token("D", None, None),
            token("E", None, Some(20.0)),
        ];
        let symbols: Vec<String> = trending_tokens(tokens.clone(), 10)
            .into_iter()
            .map(|t| t.symbol)
            .collect();
        assert_eq!(symbols, vec!["C", "E", "B", "A", "D"]);

        assert_eq!(trending_tokens(tokens, 2).len(), 2);
    }
}
