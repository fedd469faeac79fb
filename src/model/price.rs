use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub price: f64,
    pub change_24h: Option<f64>,
    pub volume_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub timeframe: Timeframe,
    pub prices: Vec<PricePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "4H")]
    FourHours,
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "ALL")]
    All,
}

impl Timeframe {
    /// Value of the price provider's `days` parameter.
    pub fn days(&self) -> &'static str {
        match self {
            Timeframe::OneHour | Timeframe::FourHours => "1",
            Timeframe::OneDay => "7",
            Timeframe::OneWeek => "30",
            Timeframe::OneMonth => "90",
            Timeframe::All => "max",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Timeframe::OneHour => "1H",
            Timeframe::FourHours => "4H",
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
            Timeframe::All => "ALL",
        };
        f.write_str(value)
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_uppercase().as_str() {
            "1H" => Ok(Timeframe::OneHour),
            "4H" => Ok(Timeframe::FourHours),
            "1D" => Ok(Timeframe::OneDay),
            "1W" => Ok(Timeframe::OneWeek),
            "1M" => Ok(Timeframe::OneMonth),
            "ALL" => Ok(Timeframe::All),
            other => Err(Error::InputValidation(format!(
                "timeframe '{}'. Valid options: 1H, 4H, 1D, 1W, 1M, ALL",
                other
            ))),
        }
    }
}
