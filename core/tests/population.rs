//! Merchant table generation tests.

use chrono::NaiveDate;
use paysynth_core::{
    config::GeneratorConfig,
    derivation::recency_window,
    engine::GeneratorEngine,
    merchant::{ActiveStatus, LoanStatus, MerchantRow, MERCHANT_COLUMNS},
    types::DATE_FORMAT,
};
use std::collections::HashSet;

fn thousand() -> (GeneratorConfig, Vec<paysynth_core::merchant::Merchant>) {
    let config = GeneratorConfig {
        merchant_count: 1000,
        ..GeneratorConfig::default_test()
    };
    let engine = GeneratorEngine::new(config.clone()).expect("valid config");
    let merchants = engine.generate_merchants(1000).expect("generate");
    (config, merchants)
}

#[test]
fn generates_requested_count_with_sequential_ids() {
    let (_, merchants) = thousand();
    assert_eq!(merchants.len(), 1000);

    for (i, m) in merchants.iter().enumerate() {
        assert_eq!(m.merchant_id, format!("BPM{}", 100_001 + i));
    }
    let ids: HashSet<_> = merchants.iter().map(|m| m.merchant_id.as_str()).collect();
    assert_eq!(ids.len(), 1000, "merchant ids must be unique");
}

#[test]
fn business_names_are_unique() {
    let (_, merchants) = thousand();
    let names: HashSet<_> = merchants.iter().map(|m| m.business_name.as_str()).collect();
    assert_eq!(names.len(), merchants.len(), "duplicate business name issued");
}

#[test]
fn zero_count_yields_empty_table() {
    let engine = GeneratorEngine::build_test().unwrap();
    let merchants = engine.generate_merchants(0).unwrap();
    assert!(merchants.is_empty());
}

#[test]
fn categorical_fields_come_from_catalogs() {
    let (config, merchants) = thousand();
    let taxonomy = &config.taxonomy;
    let geo = &config.geo;

    for m in &merchants {
        let category = taxonomy
            .category(&m.business_category)
            .unwrap_or_else(|| panic!("{} has unknown category {}", m.merchant_id, m.business_category));
        assert!(
            category.subcategories.contains(&m.subcategory),
            "{}: subcategory {} not under {}",
            m.merchant_id, m.subcategory, m.business_category
        );

        let state = geo.state(&m.state).expect("known state");
        assert!(state.districts.contains(&m.district), "{}: district outside state", m.merchant_id);
        assert_eq!(m.city, m.district);
        if let Some(mapped) = geo.tier_for_district(&m.district) {
            assert_eq!(m.tier, mapped, "{}: tier contradicts district mapping", m.merchant_id);
        }
        if let Some((lo, hi)) = state.pin_range {
            assert!((lo..=hi).contains(&m.pin_code), "{}: pin outside state range", m.merchant_id);
        }

        assert!(taxonomy.acquisition_channels.iter().any(|c| c.label == m.acquisition_channel));
        assert!(taxonomy.device_types.iter().any(|d| d.label == m.device_type));
    }
}

#[test]
fn dates_respect_window_and_status_recency() {
    let (config, merchants) = thousand();
    let earliest = config.as_of - chrono::Duration::days(config.onboarding_window_days);

    for m in &merchants {
        assert!(m.onboarding_date <= config.as_of);
        assert!(m.onboarding_date >= earliest);

        let days_ago = (config.as_of - m.last_transaction_date).num_days();
        let (lo, hi) = recency_window(m.active_status);
        assert!(
            (lo..=hi).contains(&days_ago),
            "{}: {:?} merchant last transacted {days_ago} days ago",
            m.merchant_id, m.active_status
        );
    }
}

#[test]
fn loan_fields_agree() {
    let (_, merchants) = thousand();
    for m in &merchants {
        if m.loans_taken == 0 {
            assert_eq!(m.current_loan_status, LoanStatus::None);
        } else {
            assert!((1..=3).contains(&m.loans_taken));
            assert_ne!(m.current_loan_status, LoanStatus::None);
        }
    }
}

#[test]
fn metrics_are_consistent() {
    let (_, merchants) = thousand();
    for m in &merchants {
        assert!(m.monthly_transaction_value >= 0.0);
        if m.monthly_transaction_count == 0 {
            assert_eq!(m.avg_ticket_size, 0.0);
        } else {
            let expected = m.monthly_transaction_value / m.monthly_transaction_count as f64;
            assert!((m.avg_ticket_size - expected).abs() <= 0.01, "{}: ticket size drift", m.merchant_id);
        }
    }
}

#[test]
fn status_mix_is_mostly_active() {
    let (_, merchants) = thousand();
    let active = merchants.iter().filter(|m| m.active_status == ActiveStatus::Active).count();
    let churned = merchants.iter().filter(|m| m.active_status == ActiveStatus::Churned).count();
    assert!(active > 700, "expected a mostly active book, got {active}/1000");
    assert!(churned > 0, "expected some churn in 1000 merchants");
}

#[test]
fn boundary_rows_have_no_empty_fields() {
    let (_, merchants) = thousand();
    for row in merchants.iter().map(MerchantRow::from) {
        let json = serde_json::to_value(&row).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), MERCHANT_COLUMNS.len());
        for column in MERCHANT_COLUMNS {
            let value = object.get(column).unwrap_or_else(|| panic!("missing column {column}"));
            if let Some(s) = value.as_str() {
                assert!(!s.is_empty(), "{}: empty {column}", row.merchant_id);
            }
        }
        for flag in [&row.qr_displayed, &row.soundbox_adopted, &row.swipe_machine] {
            assert!(flag == "Yes" || flag == "No");
        }
        NaiveDate::parse_from_str(&row.onboarding_date, DATE_FORMAT).expect("onboarding date format");
        NaiveDate::parse_from_str(&row.last_transaction_date, DATE_FORMAT).expect("last txn date format");
    }
}
