//! Business taxonomy: categories and their subcategories, the categorical
//! weights for acquisition channel and device type, and the product
//! feature catalog.

use crate::error::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub subcategories: Vec<String>,
    /// Multiplier applied to the tenure-based churn probability.
    pub churn_multiplier: f64,
    /// Inclusive base range for monthly transaction count.
    pub txn_count_range: (u32, u32),
    /// Base range for monthly transaction value (INR).
    pub txn_value_range: (f64, f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedLabel {
    pub label: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub name: String,
    /// Inclusive monthly frequency range when the feature is used.
    pub frequency_range: (u32, u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    pub categories: Vec<CategoryConfig>,
    pub acquisition_channels: Vec<WeightedLabel>,
    pub device_types: Vec<WeightedLabel>,
    pub features: Vec<FeatureConfig>,
}

impl Taxonomy {
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn validate(&self) -> GenResult<()> {
        if self.categories.is_empty() {
            return Err(GenError::catalog("taxonomy has no business categories"));
        }
        let mut names = HashSet::new();
        for c in &self.categories {
            if !names.insert(c.name.as_str()) {
                return Err(GenError::catalog(format!("duplicate category '{}'", c.name)));
            }
            if c.subcategories.is_empty() {
                return Err(GenError::catalog(format!(
                    "category '{}' has no subcategories",
                    c.name
                )));
            }
            if c.churn_multiplier < 0.0 {
                return Err(GenError::catalog(format!(
                    "category '{}' has a negative churn multiplier",
                    c.name
                )));
            }
            let (clo, chi) = c.txn_count_range;
            let (vlo, vhi) = c.txn_value_range;
            if clo > chi || vlo < 0.0 || vlo > vhi {
                return Err(GenError::catalog(format!(
                    "category '{}' has an invalid transaction range",
                    c.name
                )));
            }
        }

        validate_weights("acquisition channel", &self.acquisition_channels)?;
        validate_weights("device type", &self.device_types)?;

        if self.features.is_empty() {
            return Err(GenError::catalog("feature catalog is empty"));
        }
        for f in &self.features {
            let (lo, hi) = f.frequency_range;
            // A used feature must report a non-zero frequency.
            if lo == 0 || lo > hi {
                return Err(GenError::catalog(format!(
                    "feature '{}' frequency range {lo}..={hi} must start at 1 or above",
                    f.name
                )));
            }
        }
        Ok(())
    }

    pub fn builtin() -> Self {
        fn cat(name: &str, subs: &[&str], churn: f64, count: (u32, u32), value: (f64, f64)) -> CategoryConfig {
            CategoryConfig {
                name: name.into(),
                subcategories: subs.iter().map(|s| s.to_string()).collect(),
                churn_multiplier: churn,
                txn_count_range: count,
                txn_value_range: value,
            }
        }
        fn weighted(pairs: &[(&str, f64)]) -> Vec<WeightedLabel> {
            pairs
                .iter()
                .map(|(label, weight)| WeightedLabel { label: label.to_string(), weight: *weight })
                .collect()
        }
        fn feature(name: &str, lo: u32, hi: u32) -> FeatureConfig {
            FeatureConfig { name: name.into(), frequency_range: (lo, hi) }
        }

        Self {
            categories: vec![
                cat("Retail",
                    &["Kirana Store", "Grocery", "Electronics", "Apparel", "Footwear", "Stationery"],
                    0.9, (300, 800), (50_000.0, 150_000.0)),
                cat("Food & Beverage",
                    &["Restaurant", "Cafe", "Sweet Shop", "Bakery", "Street Food", "Juice Bar"],
                    1.0, (500, 1500), (75_000.0, 250_000.0)),
                cat("Services",
                    &["Salon", "Mobile Repair", "Laundry", "Tailoring", "Fitness Center"],
                    1.1, (100, 400), (30_000.0, 100_000.0)),
                cat("Wholesale",
                    &["FMCG Distributor", "Grocery Wholesale", "Textile Wholesale", "Hardware Supply"],
                    0.8, (50, 200), (200_000.0, 500_000.0)),
                cat("Healthcare",
                    &["Pharmacy", "Clinic", "Diagnostic Lab", "Optical Store"],
                    1.0, (200, 600), (60_000.0, 180_000.0)),
                cat("Automotive",
                    &["Auto Parts", "Service Station", "Tyre Shop", "Two-Wheeler Dealer"],
                    1.0, (80, 300), (80_000.0, 250_000.0)),
            ],
            acquisition_channels: weighted(&[
                ("Field Sales", 0.40),
                ("Referral", 0.25),
                ("Digital Marketing", 0.20),
                ("Channel Partner", 0.10),
                ("Walk-in", 0.05),
            ]),
            device_types: weighted(&[
                ("Android", 0.75),
                ("Feature Phone", 0.15),
                ("iOS", 0.10),
            ]),
            features: vec![
                feature("QR Payments", 15, 30),
                feature("Soundbox Alerts", 5, 20),
                feature("Business Reports", 1, 8),
                feature("Loan Dashboard", 1, 8),
                feature("Settlement Tracker", 5, 20),
                feature("Digital Khata", 5, 20),
            ],
        }
    }
}

fn validate_weights(what: &str, labels: &[WeightedLabel]) -> GenResult<()> {
    if labels.is_empty() {
        return Err(GenError::catalog(format!("no {what} entries")));
    }
    if labels.iter().any(|l| l.weight < 0.0) || labels.iter().map(|l| l.weight).sum::<f64>() <= 0.0 {
        return Err(GenError::catalog(format!(
            "{what} weights must be non-negative with a positive sum"
        )));
    }
    Ok(())
}
