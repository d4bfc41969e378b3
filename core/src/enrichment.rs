//! Enriched merchant view: merchant row plus market context from the geo
//! catalog and a few tenure/recency/size columns.

use crate::{
    derivation::tenure_days,
    error::{GenError, GenResult},
    geo::GeoCatalog,
    merchant::{LoanStatus, Merchant, MerchantRow},
    types::Days,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeBand {
    Micro,
    Small,
    Medium,
    Large,
}

impl SizeBand {
    pub fn from_monthly_value(value: f64) -> Self {
        match value {
            v if v < 50_000.0 => Self::Micro,
            v if v < 100_000.0 => Self::Small,
            v if v < 200_000.0 => Self::Medium,
            _ => Self::Large,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Micro => "Micro",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMerchant {
    #[serde(flatten)]
    pub merchant: MerchantRow,
    pub market_penetration: f64,
    pub competitive_intensity: f64,
    pub tenure_days: Days,
    pub days_since_last_txn: Days,
    pub products_adopted: u32,
    pub size_band: String,
}

/// Adopted hardware/software products, counting any loan as one product.
pub fn products_adopted(m: &Merchant) -> u32 {
    [
        m.qr_displayed,
        m.soundbox_adopted,
        m.swipe_machine,
        m.current_loan_status != LoanStatus::None,
    ]
    .iter()
    .filter(|adopted| **adopted)
    .count() as u32
}

pub fn enrich(m: &Merchant, geo: &GeoCatalog, as_of: NaiveDate) -> GenResult<EnrichedMerchant> {
    let market_penetration = geo
        .market_penetration(&m.state)
        .ok_or_else(|| GenError::catalog(format!("no market penetration for state '{}'", m.state)))?;
    let competitive_intensity = geo
        .competitive_intensity(m.tier)
        .ok_or_else(|| GenError::catalog(format!("no competitive intensity for {}", m.tier.as_str())))?;

    Ok(EnrichedMerchant {
        merchant: MerchantRow::from(m),
        market_penetration,
        competitive_intensity,
        tenure_days: tenure_days(as_of, m.onboarding_date),
        days_since_last_txn: (as_of - m.last_transaction_date).num_days(),
        products_adopted: products_adopted(m),
        size_band: SizeBand::from_monthly_value(m.monthly_transaction_value).as_str().into(),
    })
}

pub fn enrich_merchants(merchants: &[Merchant], geo: &GeoCatalog, as_of: NaiveDate) -> GenResult<Vec<EnrichedMerchant>> {
    merchants.iter().map(|m| enrich(m, geo, as_of)).collect()
}
