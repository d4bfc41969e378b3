//! Merchant and feature-usage records.
//!
//! `Merchant` is the internal form: real dates, real booleans, enums.
//! `MerchantRow` is the boundary form consumed by sinks and downstream
//! aggregation: `YYYY-MM-DD` strings, `"Yes"`/`"No"` flags, and the exact
//! column names those consumers expect.

use crate::{
    geo::Tier,
    types::{yes_no, MerchantId, DATE_FORMAT},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveStatus {
    Active,
    Dormant,
    Churned,
}

impl ActiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Dormant => "Dormant",
            Self::Churned => "Churned",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    None,
    Active,
    Closed,
    Defaulted,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Defaulted => "defaulted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Merchant {
    pub merchant_id: MerchantId,
    pub business_name: String,
    pub business_category: String,
    pub subcategory: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pin_code: u32,
    pub tier: Tier,
    pub onboarding_date: NaiveDate,
    pub acquisition_channel: String,
    pub device_type: String,
    pub active_status: ActiveStatus,
    pub last_transaction_date: NaiveDate,
    pub qr_displayed: bool,
    pub soundbox_adopted: bool,
    pub swipe_machine: bool,
    pub loans_taken: u32,
    pub current_loan_status: LoanStatus,
    pub monthly_transaction_count: u32,
    pub monthly_transaction_value: f64,
    pub avg_ticket_size: f64,
}

/// Sequential merchant id for the `index`-th merchant of a run.
pub fn merchant_id_for(index: usize) -> MerchantId {
    format!("BPM{}", 100_001 + index)
}

/// Boundary row, one column per field in consumer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantRow {
    pub merchant_id: String,
    pub business_name: String,
    pub business_category: String,
    pub subcategory: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pin_code: u32,
    pub tier: String,
    pub onboarding_date: String,
    pub acquisition_channel: String,
    pub device_type: String,
    pub active_status: String,
    pub last_transaction_date: String,
    pub qr_displayed: String,
    pub soundbox_adopted: String,
    pub swipe_machine: String,
    pub loans_taken: u32,
    pub current_loan_status: String,
    pub monthly_transaction_count: u32,
    pub monthly_transaction_value: f64,
    pub avg_ticket_size: f64,
}

pub const MERCHANT_COLUMNS: [&str; 22] = [
    "merchant_id",
    "business_name",
    "business_category",
    "subcategory",
    "city",
    "district",
    "state",
    "pin_code",
    "tier",
    "onboarding_date",
    "acquisition_channel",
    "device_type",
    "active_status",
    "last_transaction_date",
    "qr_displayed",
    "soundbox_adopted",
    "swipe_machine",
    "loans_taken",
    "current_loan_status",
    "monthly_transaction_count",
    "monthly_transaction_value",
    "avg_ticket_size",
];

impl From<&Merchant> for MerchantRow {
    fn from(m: &Merchant) -> Self {
        Self {
            merchant_id: m.merchant_id.clone(),
            business_name: m.business_name.clone(),
            business_category: m.business_category.clone(),
            subcategory: m.subcategory.clone(),
            city: m.city.clone(),
            district: m.district.clone(),
            state: m.state.clone(),
            pin_code: m.pin_code,
            tier: m.tier.as_str().into(),
            onboarding_date: m.onboarding_date.format(DATE_FORMAT).to_string(),
            acquisition_channel: m.acquisition_channel.clone(),
            device_type: m.device_type.clone(),
            active_status: m.active_status.as_str().into(),
            last_transaction_date: m.last_transaction_date.format(DATE_FORMAT).to_string(),
            qr_displayed: yes_no(m.qr_displayed).into(),
            soundbox_adopted: yes_no(m.soundbox_adopted).into(),
            swipe_machine: yes_no(m.swipe_machine).into(),
            loans_taken: m.loans_taken,
            current_loan_status: m.current_loan_status.as_str().into(),
            monthly_transaction_count: m.monthly_transaction_count,
            monthly_transaction_value: m.monthly_transaction_value,
            avg_ticket_size: m.avg_ticket_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureUsageRecord {
    pub merchant_id: MerchantId,
    pub feature: String,
    pub is_used: bool,
    pub monthly_frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureUsageRow {
    pub merchant_id: String,
    pub feature: String,
    pub is_used: String,
    pub monthly_frequency: u32,
}

impl From<&FeatureUsageRecord> for FeatureUsageRow {
    fn from(r: &FeatureUsageRecord) -> Self {
        Self {
            merchant_id: r.merchant_id.clone(),
            feature: r.feature.clone(),
            is_used: yes_no(r.is_used).into(),
            monthly_frequency: r.monthly_frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Merchant {
        Merchant {
            merchant_id: merchant_id_for(0),
            business_name: "Sharma Traders".into(),
            business_category: "Retail".into(),
            subcategory: "Kirana Store".into(),
            city: "Pune".into(),
            district: "Pune".into(),
            state: "Maharashtra".into(),
            pin_code: 411_001,
            tier: Tier::Tier1,
            onboarding_date: NaiveDate::from_ymd_opt(2023, 4, 5).unwrap(),
            acquisition_channel: "Referral".into(),
            device_type: "Android".into(),
            active_status: ActiveStatus::Dormant,
            last_transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            qr_displayed: true,
            soundbox_adopted: false,
            swipe_machine: false,
            loans_taken: 1,
            current_loan_status: LoanStatus::Closed,
            monthly_transaction_count: 410,
            monthly_transaction_value: 92_500.5,
            avg_ticket_size: 225.61,
        }
    }

    #[test]
    fn row_uses_boundary_formats() {
        let row = MerchantRow::from(&sample());
        assert_eq!(row.merchant_id, "BPM100001");
        assert_eq!(row.onboarding_date, "2023-04-05");
        assert_eq!(row.last_transaction_date, "2024-05-01");
        assert_eq!(row.qr_displayed, "Yes");
        assert_eq!(row.soundbox_adopted, "No");
        assert_eq!(row.tier, "Tier 1");
        assert_eq!(row.active_status, "Dormant");
        assert_eq!(row.current_loan_status, "closed");
    }

    #[test]
    fn row_serializes_with_consumer_column_order() {
        let json = serde_json::to_value(MerchantRow::from(&sample())).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        let mut expected = MERCHANT_COLUMNS.to_vec();
        let mut got = keys.clone();
        expected.sort_unstable();
        got.sort_unstable();
        assert_eq!(got, expected);
    }
}
