use chrono::{DateTime, Utc};

use crate::{
    error::{Error, UpstreamResult},
    model::{
        MiningInput, MiningParams, MiningProfitability, NetworkStats,
        PriceSnapshot,
    },
};

const METRIC: &str = "mining_profitability";
const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

pub fn mining_profitability(
    input: &MiningInput,
    params: &MiningParams,
    stats: UpstreamResult<NetworkStats>,
    price: UpstreamResult<PriceSnapshot>,
    now: DateTime<Utc>,
) -> Result<MiningProfitability, Error> {
    input.validate()?;

    let network_hashrate = stats
        .map_err(|e| Error::missing_input(METRIC, "network_hashrate", e))?
        .hashrate
        .filter(|hashrate| *hashrate > 0.0)
        .ok_or_else(|| {
            Error::missing_input(
                METRIC,
                "network_hashrate",
                "network hashrate unknown or zero",
            )
        })?;
    let price = price.map_err(|e| Error::missing_input(METRIC, "price", e))?;

    let hashrate_share = input.hashrate / network_hashrate;
    let daily_yield =
        hashrate_share * params.block_reward * params.blocks_per_day;
    let daily_revenue = daily_yield * price.price;

    let power_watts = input
        .power_watts
        .unwrap_or(input.hashrate * params.watts_per_hash);
    let daily_cost =
        power_watts / 1000.0 * HOURS_PER_DAY * input.electricity_cost;
    let daily_profit = daily_revenue - daily_cost;
    let monthly_profit = daily_profit * DAYS_PER_MONTH;
    let yearly_profit = daily_profit * DAYS_PER_YEAR;

    let outputs = [
        power_watts,
        hashrate_share,
        daily_yield,
        daily_revenue,
        daily_cost,
        daily_profit,
        monthly_profit,
        yearly_profit,
    ];
    if !outputs.iter().all(|value| value.is_finite()) {
        return Err(Error::InputValidation(String::from(
            "inputs are too large to produce a finite estimate",
        )));
    }

    Ok(MiningProfitability {
        hashrate: input.hashrate,
        electricity_cost: input.electricity_cost,
        power_watts,
        network_hashrate,
        hashrate_share,
        price: price.price,
        daily_yield,
        daily_revenue,
        daily_cost,
        daily_profit,
        monthly_profit,
        yearly_profit,
        computed_at: now,
    })
}
