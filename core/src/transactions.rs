//! Transaction table: a bounded sample of each merchant's recent payments.

use crate::{
    merchant::Merchant,
    rng::{GenRng, RngBank, StageSlot},
    types::{round2, Days, MerchantId, DATE_FORMAT},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const PAYMENT_METHODS: [&str; 4] = ["UPI", "Card", "Wallet", "Payment Link"];

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub merchant_id: MerchantId,
    pub transaction_date: NaiveDate,
    pub amount: f64,
    pub payment_method: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub transaction_id: String,
    pub merchant_id: String,
    pub transaction_date: String,
    pub amount: f64,
    pub payment_method: String,
}

impl From<&TransactionRecord> for TransactionRow {
    fn from(t: &TransactionRecord) -> Self {
        Self {
            transaction_id: t.transaction_id.clone(),
            merchant_id: t.merchant_id.clone(),
            transaction_date: t.transaction_date.format(DATE_FORMAT).to_string(),
            amount: t.amount,
            payment_method: t.payment_method.to_string(),
        }
    }
}

/// Payment-method weights in `PAYMENT_METHODS` order. A displayed QR
/// pulls volume to UPI; a swipe machine makes card payments possible.
pub fn payment_method_weights(merchant: &Merchant) -> [f64; 4] {
    let upi = if merchant.qr_displayed { 0.70 } else { 0.30 };
    let card = if merchant.swipe_machine { 0.25 } else { 0.02 };
    [upi, card, 0.10, 0.05]
}

/// Inclusive date window the merchant's sampled payments fall in. The
/// window ends on the last transaction date and never starts before
/// onboarding; if onboarding is after the last transaction it collapses
/// to that single day.
pub fn activity_window(merchant: &Merchant, lookback_days: Days) -> (NaiveDate, NaiveDate) {
    let end = merchant.last_transaction_date;
    let start = (end - Duration::days(lookback_days - 1)).max(merchant.onboarding_date);
    (start.min(end), end)
}

pub fn transactions_for(
    merchant: &Merchant,
    max_per_merchant: u32,
    lookback_days: Days,
    rng: &mut GenRng,
) -> Vec<TransactionRecord> {
    let n = merchant.monthly_transaction_count.min(max_per_merchant);
    if n == 0 {
        return Vec::new();
    }
    let (start, end) = activity_window(merchant, lookback_days);
    let span = (end - start).num_days();
    let weights = payment_method_weights(merchant);
    let avg = merchant.avg_ticket_size.max(1.0);

    (0..n)
        .map(|i| {
            // The first sampled payment is the last one on record.
            let date = if i == 0 {
                end
            } else {
                start + Duration::days(rng.int_inclusive(0, span))
            };
            let amount = round2(rng.pareto(avg * 0.5, 2.0).min(avg * 5.0));
            TransactionRecord {
                transaction_id: String::new(),
                merchant_id: merchant.merchant_id.clone(),
                transaction_date: date,
                amount,
                payment_method: PAYMENT_METHODS[rng.weighted_index(&weights)],
            }
        })
        .collect()
}

/// Transaction table for every merchant, with run-wide sequential ids.
pub fn generate_transactions(
    merchants: &[Merchant],
    max_per_merchant: u32,
    lookback_days: Days,
    bank: &RngBank,
) -> Vec<TransactionRecord> {
    let mut out: Vec<TransactionRecord> = merchants
        .iter()
        .flat_map(|merchant| {
            let mut rng = bank.for_key(StageSlot::Transaction, &merchant.merchant_id);
            transactions_for(merchant, max_per_merchant, lookback_days, &mut rng)
        })
        .collect();
    for (seq, txn) in out.iter_mut().enumerate() {
        txn.transaction_id = format!("TXN{:08}", seq + 1);
    }
    out
}
