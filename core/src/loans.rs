//! Loan book: one row per loan counted in `Merchant::loans_taken`.
//!
//! Loans are dated in ascending order between onboarding and the
//! merchant's last transaction. The latest loan carries the merchant's
//! `current_loan_status`; earlier loans are closed.

use crate::{
    merchant::{LoanStatus, Merchant},
    rng::{GenRng, RngBank, StageSlot},
    types::{round2, MerchantId, DATE_FORMAT},
};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MIN_LOAN_AMOUNT: f64 = 10_000.0;
pub const MAX_LOAN_AMOUNT: f64 = 1_000_000.0;
const TENURE_MONTHS: [u32; 4] = [3, 6, 9, 12];

/// (loan type, annual interest range in percent)
const LOAN_TYPES: [(&str, (f64, f64)); 4] = [
    ("Working Capital", (16.0, 22.0)),
    ("Merchant Cash Advance", (20.0, 28.0)),
    ("Inventory Loan", (15.0, 20.0)),
    ("Equipment Loan", (14.0, 18.0)),
];

#[derive(Debug, Clone, PartialEq)]
pub struct LoanRecord {
    pub loan_id: String,
    pub merchant_id: MerchantId,
    pub loan_type: &'static str,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub approval_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LoanStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRow {
    pub loan_id: String,
    pub merchant_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub approval_date: String,
    pub end_date: String,
    pub status: String,
}

impl From<&LoanRecord> for LoanRow {
    fn from(l: &LoanRecord) -> Self {
        Self {
            loan_id: l.loan_id.clone(),
            merchant_id: l.merchant_id.clone(),
            loan_type: l.loan_type.to_string(),
            loan_amount: l.loan_amount,
            interest_rate: l.interest_rate,
            approval_date: l.approval_date.format(DATE_FORMAT).to_string(),
            end_date: l.end_date.format(DATE_FORMAT).to_string(),
            status: l.status.as_str().to_string(),
        }
    }
}

/// Principal sized off monthly volume, rounded to the nearest thousand.
pub fn loan_amount(monthly_value: f64, rng: &mut GenRng) -> f64 {
    let raw = monthly_value * rng.uniform(0.5, 2.0);
    ((raw / 1000.0).round() * 1000.0).clamp(MIN_LOAN_AMOUNT, MAX_LOAN_AMOUNT)
}

pub fn loans_for(merchant: &Merchant, rng: &mut GenRng) -> Vec<LoanRecord> {
    let n = merchant.loans_taken as usize;
    if n == 0 {
        return Vec::new();
    }
    let start = merchant.onboarding_date;
    let end = merchant.last_transaction_date.max(start);
    let span = (end - start).num_days();

    let mut offsets: Vec<i64> = (0..n).map(|_| rng.int_inclusive(0, span)).collect();
    offsets.sort_unstable();

    offsets
        .into_iter()
        .enumerate()
        .map(|(i, offset)| {
            let (loan_type, (rate_lo, rate_hi)) = *rng.pick(&LOAN_TYPES);
            let approval_date = start + chrono::Duration::days(offset);
            let months = *rng.pick(&TENURE_MONTHS);
            let end_date = approval_date
                .checked_add_months(Months::new(months))
                .unwrap_or(approval_date);
            let status = if i + 1 == n {
                merchant.current_loan_status
            } else {
                LoanStatus::Closed
            };
            LoanRecord {
                loan_id: String::new(),
                merchant_id: merchant.merchant_id.clone(),
                loan_type,
                loan_amount: loan_amount(merchant.monthly_transaction_value, rng),
                interest_rate: round2(rng.uniform(rate_lo, rate_hi)),
                approval_date,
                end_date,
                status,
            }
        })
        .collect()
}

pub fn generate_loans(merchants: &[Merchant], bank: &RngBank) -> Vec<LoanRecord> {
    let mut out: Vec<LoanRecord> = merchants
        .iter()
        .flat_map(|merchant| {
            let mut rng = bank.for_key(StageSlot::Loan, &merchant.merchant_id);
            loans_for(merchant, &mut rng)
        })
        .collect();
    for (seq, loan) in out.iter_mut().enumerate() {
        loan.loan_id = format!("LN{:06}", seq + 1);
    }
    out
}
