use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiningInput {
    /// Hashes per second.
    pub hashrate: f64,
    /// USD per kWh.
    pub electricity_cost: f64,
    /// Measured rig draw in watts; estimated from hashrate when absent.
    #[serde(default)]
    pub power_watts: Option<f64>,
}

impl MiningInput {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.hashrate.is_finite() || self.hashrate <= 0.0 {
            return Err(Error::InputValidation(String::from(
                "hashrate must be a finite number greater than 0",
            )));
        }

        if !self.electricity_cost.is_finite() || self.electricity_cost < 0.0 {
            return Err(Error::InputValidation(String::from(
                "electricity_cost must be a finite number >= 0",
            )));
        }

        if let Some(power) = self.power_watts {
            if !power.is_finite() || power < 0.0 {
                return Err(Error::InputValidation(String::from(
                    "power_watts must be a finite number >= 0",
                )));
            }
        }

        Ok(())
    }
}

/// Network constants used by the profitability model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningParams {
    /// KAS per block.
    pub block_reward: f64,
    pub blocks_per_day: f64,
    /// Estimated watts drawn per H/s of hashrate.
    pub watts_per_hash: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningProfitability {
    pub hashrate: f64,
    pub electricity_cost: f64,
    pub power_watts: f64,
    pub network_hashrate: f64,
    pub hashrate_share: f64,
    pub price: f64,
    /// KAS per day.
    pub daily_yield: f64,
    pub daily_revenue: f64,
    pub daily_cost: f64,
    pub daily_profit: f64,
    pub monthly_profit: f64,
    pub yearly_profit: f64,
    pub computed_at: DateTime<Utc>,
}
