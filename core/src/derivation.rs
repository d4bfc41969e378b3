//! Conditional derivation chain.
//!
//! Each step's distribution is parameterized by attributes derived
//! earlier for the same merchant:
//!
//!   tenure ─▶ activity status ─▶ last transaction date
//!   category + tier + tenure ─▶ transaction metrics
//!   status + tenure + monthly value ─▶ product adoption
//!   status + monthly value ─▶ loan uptake and loan status
//!
//! The probability helpers are pure so their shape can be tested without
//! sampling; the `derive_*` functions add the draws.

use crate::{
    geo::Tier,
    merchant::{ActiveStatus, LoanStatus},
    rng::GenRng,
    taxonomy::CategoryConfig,
    types::{round2, Days},
};
use chrono::{Duration, NaiveDate};

/// Probability mass added on top of churn for the Dormant band.
pub const DORMANT_BAND: f64 = 0.12;

pub const QR_BASE: f64 = 0.95;
pub const SOUNDBOX_BASE: f64 = 0.35;
pub const SWIPE_BASE: f64 = 0.25;
/// Hardware adoption ramps up linearly over this many days.
pub const HARDWARE_RAMP_DAYS: f64 = 180.0;

pub const LOAN_BASE_UPTAKE: f64 = 0.20;

const JITTER: f64 = 0.15;

/// Days from onboarding to `as_of`, never negative.
pub fn tenure_days(as_of: NaiveDate, onboarding: NaiveDate) -> Days {
    (as_of - onboarding).num_days().max(0)
}

// ── Activity status ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDraw {
    pub status: ActiveStatus,
    pub last_transaction_date: NaiveDate,
}

/// Tenure-based churn probability before the category multiplier.
pub fn base_churn_probability(tenure: Days) -> f64 {
    match tenure {
        t if t < 30 => 0.15,
        t if t < 90 => 0.08,
        t if t < 365 => 0.05,
        _ => 0.03,
    }
}

pub fn churn_probability(tenure: Days, category: &CategoryConfig) -> f64 {
    base_churn_probability(tenure) * category.churn_multiplier
}

/// Inclusive "days ago" range of the last transaction for a status.
pub fn recency_window(status: ActiveStatus) -> (Days, Days) {
    match status {
        ActiveStatus::Churned => (30, 180),
        ActiveStatus::Dormant => (30, 90),
        ActiveStatus::Active => (0, 30),
    }
}

pub fn derive_status(
    rng: &mut GenRng,
    as_of: NaiveDate,
    onboarding: NaiveDate,
    category: &CategoryConfig,
) -> StatusDraw {
    let p = churn_probability(tenure_days(as_of, onboarding), category);
    let r = rng.next_f64();
    let status = if r < p {
        ActiveStatus::Churned
    } else if r < p + DORMANT_BAND {
        ActiveStatus::Dormant
    } else {
        ActiveStatus::Active
    };
    let (lo, hi) = recency_window(status);
    let days_ago = rng.int_inclusive(lo, hi);
    StatusDraw {
        status,
        last_transaction_date: as_of - Duration::days(days_ago),
    }
}

// ── Transaction metrics ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionMetrics {
    pub monthly_count: u32,
    pub monthly_value: f64,
    pub avg_ticket: f64,
}

/// Ranges for the (count, value) tier multipliers.
pub fn tier_multiplier_ranges(tier: Tier) -> ((f64, f64), (f64, f64)) {
    match tier {
        Tier::Tier1 => ((1.2, 1.5), (1.3, 1.7)),
        Tier::Tier2 => ((0.9, 1.2), (0.9, 1.3)),
        Tier::Tier3 => ((0.6, 1.0), (0.5, 0.9)),
    }
}

/// New merchants transact less until their first year is complete.
pub fn tenure_factor(tenure: Days) -> f64 {
    (tenure as f64 / 365.0).min(1.0)
}

/// Monthly count, value and average ticket from category base ranges,
/// tier multipliers, tenure ramp and jitter. When the count rounds to
/// zero, both the monthly value and the average ticket are zero: a
/// merchant with no transactions carries no volume.
pub fn derive_transaction_metrics(
    rng: &mut GenRng,
    as_of: NaiveDate,
    category: &CategoryConfig,
    tier: Tier,
    onboarding: NaiveDate,
) -> TransactionMetrics {
    let (count_lo, count_hi) = category.txn_count_range;
    let (value_lo, value_hi) = category.txn_value_range;
    let base_count = rng.int_inclusive(count_lo as i64, count_hi as i64) as f64;
    let base_value = rng.uniform(value_lo, value_hi);

    let ((cm_lo, cm_hi), (vm_lo, vm_hi)) = tier_multiplier_ranges(tier);
    let count_mult = rng.uniform(cm_lo, cm_hi);
    let value_mult = rng.uniform(vm_lo, vm_hi);

    let tenure = tenure_factor(tenure_days(as_of, onboarding));

    // Independent jitter on each side; ticket size picks up the noise.
    let count_jitter = rng.uniform(1.0 - JITTER, 1.0 + JITTER);
    let value_jitter = rng.uniform(1.0 - JITTER, 1.0 + JITTER);

    let monthly_count = (base_count * count_mult * tenure * count_jitter).round() as u32;
    let monthly_value = if monthly_count == 0 {
        0.0
    } else {
        round2(base_value * value_mult * tenure * value_jitter)
    };
    let avg_ticket = if monthly_count == 0 {
        0.0
    } else {
        round2(monthly_value / monthly_count as f64)
    };

    TransactionMetrics { monthly_count, monthly_value, avg_ticket }
}

// ── Product adoption ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adoption {
    pub qr_displayed: bool,
    pub soundbox_adopted: bool,
    pub swipe_machine: bool,
}

/// (qr, soundbox, swipe) probabilities, clamped to [0, 1].
pub fn adoption_probabilities(status: ActiveStatus, tenure: Days, monthly_value: f64) -> (f64, f64, f64) {
    let ramp = (tenure as f64 / HARDWARE_RAMP_DAYS).min(1.0);

    let (sb_value, sw_value) = match monthly_value {
        v if v > 200_000.0 => (1.5, 2.0),
        v if v > 100_000.0 => (1.3, 1.5),
        v if v > 50_000.0 => (1.1, 1.2),
        _ => (0.9, 0.8),
    };
    let (sb_status, sw_status) = match status {
        ActiveStatus::Churned => (0.5, 0.3),
        ActiveStatus::Dormant => (0.7, 0.5),
        ActiveStatus::Active => (1.0, 1.0),
    };

    let soundbox = SOUNDBOX_BASE * ramp * sb_value * sb_status;
    let swipe = SWIPE_BASE * ramp * sw_value * sw_status;
    (QR_BASE, soundbox.clamp(0.0, 1.0), swipe.clamp(0.0, 1.0))
}

pub fn derive_adoption(
    rng: &mut GenRng,
    status: ActiveStatus,
    tenure: Days,
    monthly_value: f64,
) -> Adoption {
    let (qr, soundbox, swipe) = adoption_probabilities(status, tenure, monthly_value);
    Adoption {
        qr_displayed: rng.chance(qr),
        soundbox_adopted: rng.chance(soundbox),
        swipe_machine: rng.chance(swipe),
    }
}

// ── Loans ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanDraw {
    pub loans_taken: u32,
    pub status: LoanStatus,
}

pub fn loan_uptake_probability(status: ActiveStatus, monthly_value: f64) -> f64 {
    let value_factor = match monthly_value {
        v if v > 200_000.0 => 1.8,
        v if v > 100_000.0 => 1.4,
        v if v > 50_000.0 => 1.1,
        _ => 0.7,
    };
    let status_factor = match status {
        ActiveStatus::Active => 1.0,
        ActiveStatus::Dormant => 0.5,
        ActiveStatus::Churned => 0.3,
    };
    (LOAN_BASE_UPTAKE * value_factor * status_factor).clamp(0.0, 1.0)
}

/// Weights over (active, closed, defaulted) for the current loan.
pub fn loan_status_weights(status: ActiveStatus) -> [f64; 3] {
    match status {
        ActiveStatus::Active => [0.60, 0.35, 0.05],
        ActiveStatus::Dormant => [0.40, 0.35, 0.25],
        ActiveStatus::Churned => [0.20, 0.30, 0.50],
    }
}

pub fn derive_loan_status(rng: &mut GenRng, status: ActiveStatus, monthly_value: f64) -> LoanDraw {
    if !rng.chance(loan_uptake_probability(status, monthly_value)) {
        return LoanDraw { loans_taken: 0, status: LoanStatus::None };
    }
    let loans_taken = 1 + rng.weighted_index(&[0.70, 0.20, 0.10]) as u32;
    let status = match rng.weighted_index(&loan_status_weights(status)) {
        0 => LoanStatus::Active,
        1 => LoanStatus::Closed,
        _ => LoanStatus::Defaulted,
    };
    LoanDraw { loans_taken, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn churn_probability_steps_down_with_tenure() {
        assert_eq!(base_churn_probability(0), 0.15);
        assert_eq!(base_churn_probability(29), 0.15);
        assert_eq!(base_churn_probability(30), 0.08);
        assert_eq!(base_churn_probability(89), 0.08);
        assert_eq!(base_churn_probability(90), 0.05);
        assert_eq!(base_churn_probability(364), 0.05);
        assert_eq!(base_churn_probability(365), 0.03);
    }

    #[test]
    fn last_transaction_date_matches_status_window() {
        let taxonomy = Taxonomy::builtin();
        let retail = taxonomy.category("Retail").unwrap();
        let mut rng = GenRng::from_seed(4);
        for i in 0..3_000 {
            let onboarding = as_of() - Duration::days(i % 900);
            let draw = derive_status(&mut rng, as_of(), onboarding, retail);
            let ago = (as_of() - draw.last_transaction_date).num_days();
            let (lo, hi) = recency_window(draw.status);
            assert!((lo..=hi).contains(&ago), "{:?} {ago}", draw.status);
        }
    }

    #[test]
    fn new_merchant_has_no_volume() {
        let taxonomy = Taxonomy::builtin();
        let retail = taxonomy.category("Retail").unwrap();
        let mut rng = GenRng::from_seed(1);
        let m = derive_transaction_metrics(&mut rng, as_of(), retail, Tier::Tier2, as_of());
        assert_eq!(m, TransactionMetrics { monthly_count: 0, monthly_value: 0.0, avg_ticket: 0.0 });
    }

    #[test]
    fn adoption_probabilities_follow_value_and_status() {
        let (qr, sb, sw) = adoption_probabilities(ActiveStatus::Active, 400, 250_000.0);
        assert_eq!(qr, QR_BASE);
        assert!((sb - 0.35 * 1.5).abs() < 1e-12);
        assert!((sw - 0.25 * 2.0).abs() < 1e-12);

        let (_, sb_c, sw_c) = adoption_probabilities(ActiveStatus::Churned, 400, 250_000.0);
        assert!(sb_c < sb && sw_c < sw);

        // Half-way through the ramp halves hardware adoption.
        let (_, sb_ramp, _) = adoption_probabilities(ActiveStatus::Active, 90, 250_000.0);
        assert!((sb_ramp - sb / 2.0).abs() < 1e-12);

        let (_, sb0, sw0) = adoption_probabilities(ActiveStatus::Active, 0, 250_000.0);
        assert_eq!((sb0, sw0), (0.0, 0.0));
    }

    #[test]
    fn loan_uptake_rises_with_value_and_activity() {
        let low = loan_uptake_probability(ActiveStatus::Active, 20_000.0);
        let high = loan_uptake_probability(ActiveStatus::Active, 300_000.0);
        let churned = loan_uptake_probability(ActiveStatus::Churned, 300_000.0);
        assert!(high > low);
        assert!(churned < high);
    }

    #[test]
    fn no_loan_means_status_none() {
        let mut rng = GenRng::from_seed(77);
        for _ in 0..2_000 {
            let draw = derive_loan_status(&mut rng, ActiveStatus::Dormant, 80_000.0);
            assert_eq!(draw.loans_taken == 0, draw.status == LoanStatus::None);
            assert!(draw.loans_taken <= 3);
        }
    }
}
