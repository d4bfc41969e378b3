//! Attribute samplers: draws that depend only on the reference catalogs
//! and the RNG, never on other attributes of the same merchant.

use crate::{
    geo::{GeoCatalog, Location, PIN_MAX, PIN_MIN},
    rng::GenRng,
    taxonomy::{CategoryConfig, Taxonomy, WeightedLabel},
    types::Days,
};
use chrono::{Duration, NaiveDate};

/// Category uniformly, then a subcategory nested under it.
pub fn sample_category<'a>(rng: &mut GenRng, taxonomy: &'a Taxonomy) -> (&'a CategoryConfig, &'a str) {
    let category = rng.pick(&taxonomy.categories);
    let subcategory = rng.pick(&category.subcategories);
    (category, subcategory.as_str())
}

/// State uniformly, district uniformly within it, tier from the tier lists.
///
/// Unmapped districts take a weighted fallback tier and a re-drawn district
/// from the same state. If the re-drawn district is mapped, its own tier
/// wins over the fallback, so a mapped district never carries a tier that
/// contradicts the tier lists.
pub fn sample_location(rng: &mut GenRng, geo: &GeoCatalog) -> Location {
    let state = rng.pick(&geo.states);
    let mut district = rng.pick(&state.districts);

    let tier = match geo.tier_for_district(district) {
        Some(tier) => tier,
        None => {
            let weights: Vec<f64> = geo.fallback_tier_weights.iter().map(|(_, w)| *w).collect();
            let fallback = geo.fallback_tier_weights[rng.weighted_index(&weights)].0;
            district = rng.pick(&state.districts);
            let tier = geo.tier_for_district(district).unwrap_or(fallback);
            log::debug!(
                "no tier for district in {}; fallback {} re-drew '{}' -> {}",
                state.name,
                fallback.as_str(),
                district,
                tier.as_str()
            );
            tier
        }
    };

    let pin_code = match state.pin_range {
        Some((lo, hi)) => rng.int_inclusive(lo as i64, hi as i64) as u32,
        None => rng.int_inclusive(PIN_MIN as i64, PIN_MAX as i64) as u32,
    };

    Location {
        state: state.name.clone(),
        district: district.clone(),
        city: district.clone(),
        tier,
        pin_code,
    }
}

pub fn sample_weighted<'a>(rng: &mut GenRng, labels: &'a [WeightedLabel]) -> &'a str {
    let weights: Vec<f64> = labels.iter().map(|l| l.weight).collect();
    labels[rng.weighted_index(&weights)].label.as_str()
}

pub fn sample_acquisition_channel<'a>(rng: &mut GenRng, taxonomy: &'a Taxonomy) -> &'a str {
    sample_weighted(rng, &taxonomy.acquisition_channels)
}

pub fn sample_device_type<'a>(rng: &mut GenRng, taxonomy: &'a Taxonomy) -> &'a str {
    sample_weighted(rng, &taxonomy.device_types)
}

/// Onboarding date within `window_days` before `as_of`. Days-ago follows a
/// Beta(2,5) shape over the window, so most merchants are recent.
pub fn sample_onboarding_date(rng: &mut GenRng, as_of: NaiveDate, window_days: Days) -> NaiveDate {
    let days_ago = (rng.beta_int(2, 5) * window_days as f64).floor() as Days;
    as_of - Duration::days(days_ago.min(window_days))
}
