//! Support interactions raised by merchants.
//!
//! Churned merchants contact support more often, wait longer for a fix
//! and rate the experience lower.

use crate::{
    merchant::{ActiveStatus, Merchant},
    rng::{GenRng, RngBank, StageSlot},
    types::{MerchantId, DATE_FORMAT},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

const BASE_TYPES: [&str; 4] = ["Payment Issue", "Settlement Delay", "Account Update", "KYC Verification"];
const DEVICE_ISSUE: &str = "Device Issue";
const LOAN_QUERY: &str = "Loan Query";

const CHANNELS: [&str; 5] = ["Phone", "WhatsApp", "In-App", "Email", "Field Visit"];
const CHANNEL_WEIGHTS: [f64; 5] = [0.35, 0.30, 0.20, 0.10, 0.05];

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub interaction_id: String,
    pub merchant_id: MerchantId,
    pub date: NaiveDate,
    pub interaction_type: &'static str,
    pub channel: &'static str,
    pub resolution_time_days: u32,
    pub satisfaction_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRow {
    pub interaction_id: String,
    pub merchant_id: String,
    pub date: String,
    pub interaction_type: String,
    pub channel: String,
    pub resolution_time_days: u32,
    pub satisfaction_score: u8,
}

impl From<&InteractionRecord> for InteractionRow {
    fn from(r: &InteractionRecord) -> Self {
        Self {
            interaction_id: r.interaction_id.clone(),
            merchant_id: r.merchant_id.clone(),
            date: r.date.format(DATE_FORMAT).to_string(),
            interaction_type: r.interaction_type.to_string(),
            channel: r.channel.to_string(),
            resolution_time_days: r.resolution_time_days,
            satisfaction_score: r.satisfaction_score,
        }
    }
}

pub fn interaction_count_range(status: ActiveStatus) -> (i64, i64) {
    match status {
        ActiveStatus::Active => (0, 2),
        ActiveStatus::Dormant => (1, 3),
        ActiveStatus::Churned => (1, 4),
    }
}

/// Interaction types open to this merchant.
pub fn interaction_types(merchant: &Merchant) -> Vec<&'static str> {
    let mut types = BASE_TYPES.to_vec();
    if merchant.soundbox_adopted || merchant.swipe_machine {
        types.push(DEVICE_ISSUE);
    }
    if merchant.loans_taken > 0 {
        types.push(LOAN_QUERY);
    }
    types
}

pub fn interactions_for(merchant: &Merchant, as_of: NaiveDate, rng: &mut GenRng) -> Vec<InteractionRecord> {
    let (lo, hi) = interaction_count_range(merchant.active_status);
    let n = rng.int_inclusive(lo, hi);
    let types = interaction_types(merchant);
    let span = (as_of - merchant.onboarding_date).num_days().max(0);
    let churned = merchant.active_status == ActiveStatus::Churned;

    (0..n)
        .map(|_| {
            let date = merchant.onboarding_date + Duration::days(rng.int_inclusive(0, span));
            let mut resolution = rng.int_inclusive(0, 5);
            if churned {
                resolution += rng.int_inclusive(0, 4);
            }
            let mut score = rng.int_inclusive(3, 5);
            if churned {
                score -= rng.int_inclusive(1, 2);
            }
            if resolution > 5 {
                score -= 1;
            }
            InteractionRecord {
                interaction_id: String::new(),
                merchant_id: merchant.merchant_id.clone(),
                date,
                interaction_type: *rng.pick(&types),
                channel: CHANNELS[rng.weighted_index(&CHANNEL_WEIGHTS)],
                resolution_time_days: resolution as u32,
                satisfaction_score: score.clamp(1, 5) as u8,
            }
        })
        .collect()
}

pub fn generate_interactions(merchants: &[Merchant], as_of: NaiveDate, bank: &RngBank) -> Vec<InteractionRecord> {
    let mut out: Vec<InteractionRecord> = merchants
        .iter()
        .flat_map(|merchant| {
            let mut rng = bank.for_key(StageSlot::Interaction, &merchant.merchant_id);
            interactions_for(merchant, as_of, &mut rng)
        })
        .collect();
    for (seq, r) in out.iter_mut().enumerate() {
        r.interaction_id = format!("INT{:07}", seq + 1);
    }
    out
}
