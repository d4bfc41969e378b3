//! Feature usage: one row per (merchant, catalog feature).

use crate::{
    merchant::{ActiveStatus, FeatureUsageRecord, Merchant},
    rng::{GenRng, RngBank, StageSlot},
    taxonomy::Taxonomy,
};

/// Inclusive range for how many catalog features a merchant uses.
pub fn features_used_range(status: ActiveStatus) -> (i64, i64) {
    match status {
        ActiveStatus::Active => (3, 6),
        ActiveStatus::Dormant => (1, 3),
        ActiveStatus::Churned => (0, 2),
    }
}

/// Rows for one merchant, in catalog order. Unused features report a
/// frequency of zero; used ones draw from the feature's own range.
pub fn feature_usage_for(merchant: &Merchant, taxonomy: &Taxonomy, rng: &mut GenRng) -> Vec<FeatureUsageRecord> {
    let (lo, hi) = features_used_range(merchant.active_status);
    let catalog = &taxonomy.features;
    let wanted = rng.int_inclusive(lo, hi) as usize;
    let chosen = rng.sample_indices(catalog.len(), wanted);

    catalog
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            let is_used = chosen.contains(&i);
            let monthly_frequency = if is_used {
                let (f_lo, f_hi) = feature.frequency_range;
                rng.int_inclusive(f_lo as i64, f_hi as i64) as u32
            } else {
                0
            };
            FeatureUsageRecord {
                merchant_id: merchant.merchant_id.clone(),
                feature: feature.name.clone(),
                is_used,
                monthly_frequency,
            }
        })
        .collect()
}

/// Feature-usage table for a merchant table. Each merchant draws from its
/// own stream, keyed by its merchant id, so a filtered or reordered table
/// yields the same rows per merchant.
pub fn generate_feature_usage(merchants: &[Merchant], taxonomy: &Taxonomy, bank: &RngBank) -> Vec<FeatureUsageRecord> {
    merchants
        .iter()
        .flat_map(|merchant| {
            let mut rng = bank.for_key(StageSlot::FeatureUsage, &merchant.merchant_id);
            feature_usage_for(merchant, taxonomy, &mut rng)
        })
        .collect()
}
