//! The generation engine.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Merchants        (names, samplers, derivation chain)
//!   2. Feature usage
//!   3. Enrichment       (market context, no randomness)
//!   4. Transactions
//!   5. Interactions
//!   6. Loans
//!
//! RULES:
//!   - Every stage after 1 reads only the finished merchant table.
//!   - All randomness flows through the RngBank.
//!   - Nothing is mutated after its stage completes.

use crate::{
    assembler::MerchantAssembler,
    config::GeneratorConfig,
    enrichment::{enrich_merchants, EnrichedMerchant},
    error::GenResult,
    feature_usage,
    interactions::{generate_interactions, InteractionRecord},
    loans::{generate_loans, LoanRecord},
    merchant::{FeatureUsageRecord, Merchant},
    rng::RngBank,
    store::DatasetStore,
    transactions::{generate_transactions, TransactionRecord},
    types::RunId,
};

/// Fresh identifier for a persisted run. Run ids never feed the RNG, so
/// they do not affect reproducibility of the generated tables.
pub fn new_run_id() -> RunId {
    uuid::Uuid::new_v4().to_string()
}

/// Every table produced by one run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub merchants: Vec<Merchant>,
    pub enriched: Vec<EnrichedMerchant>,
    pub feature_usage: Vec<FeatureUsageRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub interactions: Vec<InteractionRecord>,
    pub loans: Vec<LoanRecord>,
}

impl Dataset {
    /// Write every table under `run_id`.
    pub fn persist(&self, store: &DatasetStore, run_id: &str) -> GenResult<()> {
        store.insert_merchants(run_id, &self.merchants)?;
        store.insert_enriched(run_id, &self.enriched)?;
        store.insert_feature_usage(run_id, &self.feature_usage)?;
        store.insert_transactions(run_id, &self.transactions)?;
        store.insert_interactions(run_id, &self.interactions)?;
        store.insert_loans(run_id, &self.loans)?;
        log::info!("run={run_id}: persisted {} merchants and satellite tables", self.merchants.len());
        Ok(())
    }
}

pub struct GeneratorEngine {
    pub config: GeneratorConfig,
    pub rng_bank: RngBank,
}

impl GeneratorEngine {
    /// Validate the config and seed the RNG bank. Bad catalogs fail here,
    /// before any merchant is drawn.
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        let rng_bank = RngBank::new(config.seed);
        Ok(Self { config, rng_bank })
    }

    /// Built-in catalogs, fixed as-of date, seed 42, 50 merchants.
    pub fn build_test() -> GenResult<Self> {
        Self::new(GeneratorConfig::default_test())
    }

    /// Merchant table for `count` merchants. A fresh name set per call.
    pub fn generate_merchants(&self, count: usize) -> GenResult<Vec<Merchant>> {
        let merchants = MerchantAssembler::new(&self.config, &self.rng_bank).generate_merchants(count)?;
        log::info!("merchant: generated {} merchants (seed={})", merchants.len(), self.config.seed);
        Ok(merchants)
    }

    pub fn generate_feature_usage(&self, merchants: &[Merchant]) -> Vec<FeatureUsageRecord> {
        let rows = feature_usage::generate_feature_usage(merchants, &self.config.taxonomy, &self.rng_bank);
        log::info!("feature_usage: {} rows", rows.len());
        rows
    }

    /// Run every stage for `config.merchant_count` merchants.
    pub fn run(&self) -> GenResult<Dataset> {
        let cfg = &self.config;
        let merchants = self.generate_merchants(cfg.merchant_count)?;
        let feature_usage = self.generate_feature_usage(&merchants);
        let enriched = enrich_merchants(&merchants, &cfg.geo, cfg.as_of)?;

        let transactions = generate_transactions(
            &merchants,
            cfg.max_transactions_per_merchant,
            cfg.transaction_lookback_days,
            &self.rng_bank,
        );
        log::info!("transaction: {} rows", transactions.len());

        let interactions = generate_interactions(&merchants, cfg.as_of, &self.rng_bank);
        log::info!("interaction: {} rows", interactions.len());

        let loans = generate_loans(&merchants, &self.rng_bank);
        log::info!("loan: {} rows", loans.len());

        Ok(Dataset {
            merchants,
            enriched,
            feature_usage,
            transactions,
            interactions,
            loans,
        })
    }
}
