use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::{
    error::{Error, UpstreamResult},
    model::{
        RichListEntry, WhaleList, WhaleRecord, WhaleStatistics, UNKNOWN_LABEL,
    },
};

const PERCENT_SCALE: i64 = 4;

/// Share of `supply` in percent, four decimals, clamped to `[0, 100]`.
fn percentage_of(amount: &BigDecimal, supply: &BigDecimal) -> BigDecimal {
    let zero = BigDecimal::from(0);
    let hundred = BigDecimal::from(100);
    if *supply <= zero {
        return zero;
    }

    let percentage = (amount * &hundred / supply).round(PERCENT_SCALE);
    if percentage < zero {
        zero
    } else if percentage > hundred {
        hundred
    } else {
        percentage
    }
}

/// Balance descending, then address ascending.
fn sort_rich_list(entries: &mut [RichListEntry]) {
    entries.sort_by(|a, b| {
        b.balance
            .cmp(&a.balance)
            .then_with(|| a.address.cmp(&b.address))
    });
}

pub fn rank_whales(
    entries: UpstreamResult<Vec<RichListEntry>>,
    limit: usize,
    supply: &BigDecimal,
    labels: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Result<WhaleList, Error> {
    let mut entries = entries
        .map_err(|e| Error::missing_input("whale_ranking", "rich_list", e))?;
    sort_rich_list(&mut entries);

    let whales = entries
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, entry)| WhaleRecord {
            rank: index as u32 + 1,
            label: labels
                .get(&entry.address.to_lowercase())
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_owned()),
            percentage_of_supply: percentage_of(&entry.balance, supply),
            address: entry.address,
            balance: entry.balance,
            tx_count: entry.tx_count,
        })
        .collect::<Vec<WhaleRecord>>();

    Ok(WhaleList {
        count: whales.len(),
        whales,
        computed_at: now,
    })
}

pub fn whale_statistics(
    entries: UpstreamResult<Vec<RichListEntry>>,
    supply: &BigDecimal,
    now: DateTime<Utc>,
) -> Result<WhaleStatistics, Error> {
    let entries = entries
        .map_err(|e| Error::missing_input("whale_statistics", "rich_list", e))?;

    let total_whales = entries.len();
    let total_whale_balance = entries
        .iter()
        .fold(BigDecimal::from(0), |acc, entry| acc + &entry.balance);
    let whale_concentration_percentage =
        percentage_of(&total_whale_balance, supply);

    let average_whale_balance = if total_whales > 0 {
        let count = BigDecimal::from(total_whales as u64);
        Some(total_whale_balance.clone() / count)
    } else {
        None
    };
    let largest_whale_balance =
        entries.iter().map(|entry| &entry.balance).max().cloned();
    let smallest_whale_balance =
        entries.iter().map(|entry| &entry.balance).min().cloned();

    Ok(WhaleStatistics {
        total_whales,
        total_whale_balance,
        whale_concentration_percentage,
        average_whale_balance,
        largest_whale_balance,
        smallest_whale_balance,
        computed_at: now,
    })
}
