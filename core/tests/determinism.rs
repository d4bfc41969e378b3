//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two engines, same config, same seed.
//! They must produce byte-identical tables.
//! Any divergence is a blocker. Do not merge until fixed.

use paysynth_core::{
    config::GeneratorConfig,
    engine::{Dataset, GeneratorEngine},
    interactions::InteractionRow,
    loans::LoanRow,
    merchant::{FeatureUsageRow, MerchantRow},
    transactions::TransactionRow,
};

fn build_engine(seed: u64, count: usize) -> GeneratorEngine {
    let mut config = GeneratorConfig::default_test();
    config.seed = seed;
    config.merchant_count = count;
    GeneratorEngine::new(config).expect("valid config")
}

/// Every table, serialized row by row in boundary form.
fn serialize_tables(dataset: &Dataset) -> Vec<String> {
    let mut lines = Vec::new();
    for m in &dataset.merchants {
        lines.push(serde_json::to_string(&MerchantRow::from(m)).expect("merchant json"));
    }
    for e in &dataset.enriched {
        lines.push(serde_json::to_string(e).expect("enriched json"));
    }
    for f in &dataset.feature_usage {
        lines.push(serde_json::to_string(&FeatureUsageRow::from(f)).expect("feature json"));
    }
    for t in &dataset.transactions {
        lines.push(serde_json::to_string(&TransactionRow::from(t)).expect("txn json"));
    }
    for i in &dataset.interactions {
        lines.push(serde_json::to_string(&InteractionRow::from(i)).expect("interaction json"));
    }
    for l in &dataset.loans {
        lines.push(serde_json::to_string(&LoanRow::from(l)).expect("loan json"));
    }
    lines
}

#[test]
fn same_seed_produces_identical_tables() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let a = build_engine(SEED, 300).run().expect("engine_a run");
    let b = build_engine(SEED, 300).run().expect("engine_b run");

    let log_a = serialize_tables(&a);
    let log_b = serialize_tables(&b);

    assert_eq!(
        log_a.len(), log_b.len(),
        "Row counts differ: {} vs {}",
        log_a.len(), log_b.len()
    );

    for (i, (a, b)) in log_a.iter().zip(log_b.iter()).enumerate() {
        assert_eq!(a, b, "Tables diverged at row {i}:\n  A: {a}\n  B: {b}");
    }
}

#[test]
fn different_seeds_produce_different_tables() {
    let a = build_engine(42, 100).run().expect("run a");
    let b = build_engine(99, 100).run().expect("run b");

    let rows_a: Vec<MerchantRow> = a.merchants.iter().map(MerchantRow::from).collect();
    let rows_b: Vec<MerchantRow> = b.merchants.iter().map(MerchantRow::from).collect();

    let any_different = rows_a.iter().zip(rows_b.iter()).any(|(a, b)| a != b);
    assert!(any_different, "Different seeds produced identical merchants; seed is not being used");
}

#[test]
fn merchant_prefix_is_stable_across_counts() {
    // Each merchant draws from its own stream, so a shorter run is a
    // prefix of a longer one with the same seed.
    let short = build_engine(7, 20).generate_merchants(20).expect("short");
    let long = build_engine(7, 20).generate_merchants(60).expect("long");

    assert_eq!(short.as_slice(), &long[..20]);
}

#[test]
fn feature_usage_depends_only_on_merchant_table() {
    let engine = build_engine(11, 40);
    let merchants = engine.generate_merchants(40).expect("merchants");

    let first = engine.generate_feature_usage(&merchants);
    let second = engine.generate_feature_usage(&merchants);
    assert_eq!(first, second);
}
