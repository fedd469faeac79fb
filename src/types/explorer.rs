use bigdecimal::BigDecimal;
use serde::Deserialize;

use super::numeric::{opt_decimal, opt_u64};
use crate::{
    error::{Provider, UpstreamError, UpstreamResult},
    model::RichListEntry,
};

/// Sompi per KAS.
pub const SOMPI_PER_KAS: i64 = 100_000_000;

pub fn sompi_to_kas(sompi: BigDecimal) -> BigDecimal {
    sompi / BigDecimal::from(SOMPI_PER_KAS)
}

/// One entry of `/addresses/top`, balance in sompi.
#[derive(Debug, Deserialize)]
pub struct RichListItem {
    pub address: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub balance: Option<BigDecimal>,
    #[serde(default, alias = "txCount", deserialize_with = "opt_u64")]
    pub tx_count: Option<u64>,
}

impl RichListItem {
    pub fn into_entry(self) -> UpstreamResult<RichListEntry> {
        let address =
            self.address.filter(|a| !a.is_empty()).ok_or_else(|| {
                UpstreamError::decode(
                    Provider::Explorer,
                    "rich list entry without address",
                )
            })?;
        let balance = self.balance.ok_or_else(|| {
            UpstreamError::decode(
                Provider::Explorer,
                format!("rich list entry {} without balance", address),
            )
        })?;

        Ok(RichListEntry {
            address,
            balance: sompi_to_kas(balance),
            tx_count: self.tx_count,
        })
    }
}

/// `/addresses/{address}/balance`, sompi.
#[derive(Debug, Deserialize)]
pub struct AddressBalance {
    pub address: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub balance: Option<BigDecimal>,
}

impl AddressBalance {
    pub fn into_kas(self) -> UpstreamResult<BigDecimal> {
        self.balance.map(sompi_to_kas).ok_or_else(|| {
            UpstreamError::decode(Provider::Explorer, "field 'balance' absent")
        })
    }
}

/// `/addresses/{address}/transactions-count`.
#[derive(Debug, Deserialize)]
pub struct AddressTxCount {
    #[serde(default, deserialize_with = "opt_u64")]
    pub total: Option<u64>,
}
