//! Geo catalog: states, districts, city tiers, pin-code ranges and the
//! market tables used for enrichment.
//!
//! Entries are ordered `Vec`s, never hash maps, so that uniform picks
//! are reproducible under a fixed seed.

use crate::error::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Tier 1")]
    Tier1,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 3")]
    Tier3,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Tier1, Tier::Tier2, Tier::Tier3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1",
            Self::Tier2 => "Tier 2",
            Self::Tier3 => "Tier 3",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEntry {
    pub name: String,
    pub districts: Vec<String>,
    /// Inclusive pin-code range. `None` means the state is unmapped and
    /// gets a random 6-digit pin.
    #[serde(default)]
    pub pin_range: Option<(u32, u32)>,
    pub market_penetration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierEntry {
    pub tier: Tier,
    pub districts: Vec<String>,
    pub competitive_intensity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoCatalog {
    pub states: Vec<StateEntry>,
    pub tiers: Vec<TierEntry>,
    /// Weights used when a district has no tier entry.
    pub fallback_tier_weights: Vec<(Tier, f64)>,
}

/// A sampled merchant location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub state: String,
    pub district: String,
    pub city: String,
    pub tier: Tier,
    pub pin_code: u32,
}

pub const PIN_MIN: u32 = 100_000;
pub const PIN_MAX: u32 = 999_999;

impl GeoCatalog {
    pub fn state(&self, name: &str) -> Option<&StateEntry> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Tier of a district according to the tier lists, if it has one.
    pub fn tier_for_district(&self, district: &str) -> Option<Tier> {
        self.tiers
            .iter()
            .find(|t| t.districts.iter().any(|d| d == district))
            .map(|t| t.tier)
    }

    pub fn market_penetration(&self, state: &str) -> Option<f64> {
        self.state(state).map(|s| s.market_penetration)
    }

    pub fn competitive_intensity(&self, tier: Tier) -> Option<f64> {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.competitive_intensity)
    }

    /// Fail fast on tables the sampler cannot draw from.
    pub fn validate(&self) -> GenResult<()> {
        if self.states.is_empty() {
            return Err(GenError::catalog("geo catalog has no states"));
        }
        let mut seen_states = HashSet::new();
        for state in &self.states {
            if state.name.trim().is_empty() {
                return Err(GenError::catalog("state with empty name"));
            }
            if !seen_states.insert(state.name.as_str()) {
                return Err(GenError::catalog(format!("duplicate state '{}'", state.name)));
            }
            if state.districts.is_empty() {
                return Err(GenError::catalog(format!(
                    "state '{}' has an empty district list",
                    state.name
                )));
            }
            if state.districts.iter().any(|d| d.trim().is_empty()) {
                return Err(GenError::catalog(format!(
                    "state '{}' has a blank district name",
                    state.name
                )));
            }
            if let Some((lo, hi)) = state.pin_range {
                if lo > hi || lo < PIN_MIN || hi > PIN_MAX {
                    return Err(GenError::catalog(format!(
                        "state '{}' has invalid pin range {lo}..={hi}",
                        state.name
                    )));
                }
            }
            if !(0.0..=1.0).contains(&state.market_penetration) {
                return Err(GenError::catalog(format!(
                    "state '{}' market penetration {} outside [0, 1]",
                    state.name, state.market_penetration
                )));
            }
        }

        let mut seen_districts = HashSet::new();
        for tier in Tier::ALL {
            let entries = self.tiers.iter().filter(|t| t.tier == tier).count();
            if entries != 1 {
                return Err(GenError::catalog(format!(
                    "expected exactly one entry for {}, found {entries}",
                    tier.as_str()
                )));
            }
        }
        for entry in &self.tiers {
            for district in &entry.districts {
                if !seen_districts.insert(district.as_str()) {
                    return Err(GenError::catalog(format!(
                        "district '{district}' is listed under more than one tier"
                    )));
                }
            }
        }

        if self.fallback_tier_weights.is_empty()
            || self.fallback_tier_weights.iter().any(|(_, w)| *w < 0.0)
            || self.fallback_tier_weights.iter().map(|(_, w)| w).sum::<f64>() <= 0.0
        {
            return Err(GenError::catalog("fallback tier weights must be non-negative with a positive sum"));
        }
        Ok(())
    }

    pub fn builtin() -> Self {
        fn state(name: &str, districts: &[&str], pin_range: Option<(u32, u32)>, pen: f64) -> StateEntry {
            StateEntry {
                name: name.into(),
                districts: districts.iter().map(|d| d.to_string()).collect(),
                pin_range,
                market_penetration: pen,
            }
        }
        fn tier(tier: Tier, districts: &[&str], intensity: f64) -> TierEntry {
            TierEntry {
                tier,
                districts: districts.iter().map(|d| d.to_string()).collect(),
                competitive_intensity: intensity,
            }
        }

        Self {
            states: vec![
                state("Maharashtra",
                    &["Mumbai", "Pune", "Nagpur", "Nashik", "Thane", "Aurangabad", "Kolhapur"],
                    Some((400_001, 445_402)), 0.42),
                state("Karnataka",
                    &["Bengaluru", "Mysuru", "Hubballi", "Mangaluru", "Belagavi", "Davanagere"],
                    Some((560_001, 591_346)), 0.38),
                state("Delhi",
                    &["New Delhi", "North Delhi", "South Delhi", "East Delhi", "West Delhi"],
                    Some((110_001, 110_096)), 0.47),
                state("Tamil Nadu",
                    &["Chennai", "Coimbatore", "Madurai", "Tiruchirappalli", "Salem", "Vellore"],
                    Some((600_001, 643_253)), 0.35),
                state("Uttar Pradesh",
                    &["Lucknow", "Kanpur", "Noida", "Varanasi", "Agra", "Prayagraj", "Gorakhpur"],
                    Some((201_001, 285_223)), 0.22),
                state("Gujarat",
                    &["Ahmedabad", "Surat", "Vadodara", "Rajkot", "Bhavnagar", "Jamnagar"],
                    Some((360_001, 396_590)), 0.33),
                state("West Bengal",
                    &["Kolkata", "Howrah", "Durgapur", "Siliguri", "Asansol"],
                    Some((700_001, 743_711)), 0.27),
                state("Rajasthan",
                    &["Jaipur", "Jodhpur", "Udaipur", "Kota", "Ajmer", "Bikaner"],
                    Some((301_001, 345_034)), 0.24),
                state("Telangana",
                    &["Hyderabad", "Warangal", "Karimnagar", "Nizamabad", "Khammam"],
                    Some((500_001, 509_412)), 0.36),
                state("Punjab",
                    &["Ludhiana", "Amritsar", "Jalandhar", "Patiala", "Bathinda"],
                    None, 0.25),
            ],
            tiers: vec![
                tier(Tier::Tier1, &[
                    "Mumbai", "Pune", "Bengaluru", "New Delhi", "South Delhi",
                    "Chennai", "Hyderabad", "Ahmedabad", "Kolkata",
                ], 0.85),
                tier(Tier::Tier2, &[
                    "Nagpur", "Nashik", "Thane", "Mysuru", "Mangaluru", "North Delhi",
                    "Coimbatore", "Madurai", "Lucknow", "Kanpur", "Noida", "Surat",
                    "Vadodara", "Rajkot", "Howrah", "Jaipur", "Jodhpur", "Warangal",
                    "Ludhiana", "Amritsar",
                ], 0.60),
                tier(Tier::Tier3, &[
                    "Aurangabad", "Kolhapur", "Hubballi", "Belagavi", "Tiruchirappalli",
                    "Salem", "Varanasi", "Agra", "Prayagraj", "Bhavnagar", "Durgapur",
                    "Siliguri", "Udaipur", "Kota", "Ajmer", "Karimnagar", "Jalandhar",
                    "Patiala",
                ], 0.35),
            ],
            fallback_tier_weights: vec![
                (Tier::Tier1, 0.2),
                (Tier::Tier2, 0.3),
                (Tier::Tier3, 0.5),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        GeoCatalog::builtin().validate().unwrap();
    }

    #[test]
    fn every_tiered_district_belongs_to_some_state() {
        let geo = GeoCatalog::builtin();
        for entry in &geo.tiers {
            for d in &entry.districts {
                assert!(
                    geo.states.iter().any(|s| s.districts.contains(d)),
                    "tiered district '{d}' is not in any state"
                );
            }
        }
    }

    #[test]
    fn empty_district_list_is_rejected() {
        let mut geo = GeoCatalog::builtin();
        geo.states[0].districts.clear();
        let err = geo.validate().unwrap_err();
        assert!(matches!(err, GenError::InvalidCatalog { .. }), "got {err}");
    }

    #[test]
    fn inverted_pin_range_is_rejected() {
        let mut geo = GeoCatalog::builtin();
        geo.states[1].pin_range = Some((591_346, 560_001));
        assert!(geo.validate().is_err());
    }

    #[test]
    fn tier_lookup() {
        let geo = GeoCatalog::builtin();
        assert_eq!(geo.tier_for_district("Mumbai"), Some(Tier::Tier1));
        assert_eq!(geo.tier_for_district("Agra"), Some(Tier::Tier3));
        assert_eq!(geo.tier_for_district("Bathinda"), None);
    }
}
