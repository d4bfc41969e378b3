//! Synthetic merchant-ecosystem generator.
//!
//! Builds a reproducible population of payment merchants whose fields are
//! derived through a chain of conditional rules, plus the satellite tables
//! (feature usage, transactions, support interactions, loans) keyed by
//! merchant id. Output is handed to [`store::DatasetStore`] or consumed in
//! memory.

pub mod assembler;
pub mod config;
pub mod derivation;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod feature_usage;
pub mod geo;
pub mod interactions;
pub mod loans;
pub mod merchant;
pub mod name_generator;
pub mod rng;
pub mod sampler;
pub mod store;
pub mod taxonomy;
pub mod transactions;
pub mod types;
