use crate::{
    derivation::recency_window,
    error::{GenError, GenResult},
    geo::GeoCatalog,
    merchant::ActiveStatus,
    taxonomy::Taxonomy,
    types::Days,
};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MERCHANT_COUNT: usize = 1000;
/// Onboarding dates fall within this many days before the as-of date.
pub const DEFAULT_ONBOARDING_WINDOW_DAYS: Days = 3 * 365;
pub const DEFAULT_MAX_TRANSACTIONS_PER_MERCHANT: u32 = 30;
pub const DEFAULT_TRANSACTION_LOOKBACK_DAYS: Days = 90;
/// Upper bound for any configured day window (about a century).
pub const MAX_WINDOW_DAYS: Days = 36_500;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub merchant_count: usize,
    /// The generation reference date. Tenure and recency are measured
    /// against it; fixing it makes output byte-identical across days.
    pub as_of: NaiveDate,
    pub onboarding_window_days: Days,
    pub max_transactions_per_merchant: u32,
    pub transaction_lookback_days: Days,
    pub geo: GeoCatalog,
    pub taxonomy: Taxonomy,
}

/// On-disk form. Every field is optional; missing ones take built-ins.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    seed: Option<u64>,
    merchant_count: Option<usize>,
    as_of: Option<NaiveDate>,
    onboarding_window_days: Option<Days>,
    max_transactions_per_merchant: Option<u32>,
    transaction_lookback_days: Option<Days>,
    geo: Option<GeoCatalog>,
    taxonomy: Option<Taxonomy>,
}

impl GeneratorConfig {
    /// Built-in catalogs and defaults, measured against `as_of`.
    pub fn with_as_of(as_of: NaiveDate) -> Self {
        Self {
            seed: DEFAULT_SEED,
            merchant_count: DEFAULT_MERCHANT_COUNT,
            as_of,
            onboarding_window_days: DEFAULT_ONBOARDING_WINDOW_DAYS,
            max_transactions_per_merchant: DEFAULT_MAX_TRANSACTIONS_PER_MERCHANT,
            transaction_lookback_days: DEFAULT_TRANSACTION_LOOKBACK_DAYS,
            geo: GeoCatalog::builtin(),
            taxonomy: Taxonomy::builtin(),
        }
    }

    /// Load overrides from a JSON file. `fallback_as_of` is used when the
    /// file does not pin a date.
    pub fn load(path: &str, fallback_as_of: NaiveDate) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: ConfigFile = serde_json::from_str(&content)?;
        let base = Self::with_as_of(file.as_of.unwrap_or(fallback_as_of));
        Ok(Self {
            seed: file.seed.unwrap_or(base.seed),
            merchant_count: file.merchant_count.unwrap_or(base.merchant_count),
            as_of: base.as_of,
            onboarding_window_days: file
                .onboarding_window_days
                .unwrap_or(base.onboarding_window_days),
            max_transactions_per_merchant: file
                .max_transactions_per_merchant
                .unwrap_or(base.max_transactions_per_merchant),
            transaction_lookback_days: file
                .transaction_lookback_days
                .unwrap_or(base.transaction_lookback_days),
            geo: file.geo.unwrap_or(base.geo),
            taxonomy: file.taxonomy.unwrap_or(base.taxonomy),
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap_or_default();
        Self {
            merchant_count: 50,
            ..Self::with_as_of(as_of)
        }
    }

    /// Startup validation. Generation never starts on a bad config.
    pub fn validate(&self) -> GenResult<()> {
        // Last-transaction dates can sit up to this far before as_of, and
        // the lookback window is measured back from them.
        let (_, max_recency) = recency_window(ActiveStatus::Churned);
        for (field, days) in [
            ("onboarding_window_days", self.onboarding_window_days),
            ("transaction_lookback_days", self.transaction_lookback_days),
        ] {
            if days <= 0 {
                return Err(GenError::config(format!("{field} must be positive")));
            }
            if days > MAX_WINDOW_DAYS {
                return Err(GenError::config(format!(
                    "{field} = {days} exceeds the {MAX_WINDOW_DAYS}-day limit"
                )));
            }
            if self.as_of.checked_sub_signed(Duration::days(days + max_recency)).is_none() {
                return Err(GenError::config(format!(
                    "{field} = {days} reaches before the earliest representable date from {}",
                    self.as_of
                )));
            }
        }
        self.geo.validate()?;
        self.taxonomy.validate()?;
        Ok(())
    }
}
