//! Transaction, interaction and loan table tests.

use paysynth_core::{
    config::GeneratorConfig,
    engine::{Dataset, GeneratorEngine},
    loans::{MAX_LOAN_AMOUNT, MIN_LOAN_AMOUNT},
    merchant::{LoanStatus, Merchant},
    transactions::{activity_window, PAYMENT_METHODS},
};
use std::collections::HashMap;

fn dataset(seed: u64) -> (GeneratorConfig, Dataset) {
    let config = GeneratorConfig {
        seed,
        merchant_count: 400,
        ..GeneratorConfig::default_test()
    };
    let dataset = GeneratorEngine::new(config.clone()).unwrap().run().unwrap();
    (config, dataset)
}

fn by_id(merchants: &[Merchant]) -> HashMap<&str, &Merchant> {
    merchants.iter().map(|m| (m.merchant_id.as_str(), m)).collect()
}

#[test]
fn transactions_fall_inside_activity_window() {
    let (config, ds) = dataset(42);
    let merchants = by_id(&ds.merchants);

    for t in &ds.transactions {
        let m = merchants[t.merchant_id.as_str()];
        let (start, end) = activity_window(m, config.transaction_lookback_days);
        assert!(t.transaction_date >= start && t.transaction_date <= end, "{}", t.transaction_id);
        assert!(t.amount > 0.0);
        assert!(t.amount <= m.avg_ticket_size.max(1.0) * 5.0 + 0.01);
        assert!(PAYMENT_METHODS.contains(&t.payment_method));
    }
}

#[test]
fn transaction_count_is_capped_and_latest_matches_merchant() {
    let (config, ds) = dataset(43);

    let mut per_merchant: HashMap<&str, Vec<_>> = HashMap::new();
    for t in &ds.transactions {
        per_merchant.entry(t.merchant_id.as_str()).or_default().push(t);
    }

    for m in &ds.merchants {
        let rows = per_merchant.get(m.merchant_id.as_str()).cloned().unwrap_or_default();
        let expected = m.monthly_transaction_count.min(config.max_transactions_per_merchant) as usize;
        assert_eq!(rows.len(), expected, "{}", m.merchant_id);
        if let Some(latest) = rows.iter().map(|t| t.transaction_date).max() {
            assert_eq!(latest, m.last_transaction_date, "{}", m.merchant_id);
        }
    }
}

#[test]
fn transaction_ids_are_sequential() {
    let (_, ds) = dataset(44);
    for (i, t) in ds.transactions.iter().enumerate() {
        assert_eq!(t.transaction_id, format!("TXN{:08}", i + 1));
    }
}

#[test]
fn loan_rows_match_merchant_summary() {
    let (_, ds) = dataset(45);

    let mut per_merchant: HashMap<&str, Vec<_>> = HashMap::new();
    for l in &ds.loans {
        per_merchant.entry(l.merchant_id.as_str()).or_default().push(l);
    }

    for m in &ds.merchants {
        let loans = per_merchant.get(m.merchant_id.as_str()).cloned().unwrap_or_default();
        assert_eq!(loans.len(), m.loans_taken as usize, "{}", m.merchant_id);
        let Some(latest) = loans.last() else { continue };
        assert_eq!(latest.status, m.current_loan_status);
        for pair in loans.windows(2) {
            assert!(pair[0].approval_date <= pair[1].approval_date);
            assert_eq!(pair[0].status, LoanStatus::Closed);
        }
        for l in &loans {
            assert!(l.approval_date >= m.onboarding_date);
            assert!(l.end_date > l.approval_date);
            assert!((MIN_LOAN_AMOUNT..=MAX_LOAN_AMOUNT).contains(&l.loan_amount));
            assert!(l.interest_rate > 0.0);
        }
    }
    for (i, l) in ds.loans.iter().enumerate() {
        assert_eq!(l.loan_id, format!("LN{:06}", i + 1));
    }
}

#[test]
fn interactions_respect_merchant_context() {
    let (config, ds) = dataset(46);
    let merchants = by_id(&ds.merchants);

    for i in &ds.interactions {
        let m = merchants[i.merchant_id.as_str()];
        assert!(i.date >= m.onboarding_date && i.date <= config.as_of);
        assert!((1..=5).contains(&i.satisfaction_score));
        if i.interaction_type == "Device Issue" {
            assert!(m.soundbox_adopted || m.swipe_machine, "{}", i.interaction_id);
        }
        if i.interaction_type == "Loan Query" {
            assert!(m.loans_taken > 0, "{}", i.interaction_id);
        }
    }
}

#[test]
fn enrichment_covers_every_merchant() {
    let (config, ds) = dataset(47);
    assert_eq!(ds.enriched.len(), ds.merchants.len());

    for (e, m) in ds.enriched.iter().zip(&ds.merchants) {
        assert_eq!(e.merchant.merchant_id, m.merchant_id);
        assert_eq!(e.tenure_days, (config.as_of - m.onboarding_date).num_days());
        assert_eq!(e.days_since_last_txn, (config.as_of - m.last_transaction_date).num_days());
        assert!((0.0..=1.0).contains(&e.market_penetration));
        assert!(e.products_adopted <= 4);
    }
}
