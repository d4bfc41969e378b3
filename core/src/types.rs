//! Shared primitive types used across the generator.

/// A stable, unique identifier for a merchant (`BPM100001`, ...).
pub type MerchantId = String;

/// The canonical run identifier.
pub type RunId = String;

/// A whole number of calendar days.
pub type Days = i64;

/// Boundary format for every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Round a currency amount to two decimals (paise).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Boundary rendering of an internal boolean flag.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
