//! Merchant assembler: runs samplers and the derivation chain once per
//! merchant id.
//!
//! Per-merchant order (fixed, later draws consume earlier ones):
//!   1. location
//!   2. category / subcategory
//!   3. acquisition channel, device type
//!   4. onboarding date → tenure
//!   5. activity status + last transaction date
//!   6. transaction metrics
//!   7. product adoption
//!   8. loan status
//!
//! Names come from one sequential stream because the used-name set is
//! shared across the run; every other draw uses the merchant's own stream.

use crate::{
    config::GeneratorConfig,
    derivation::{derive_adoption, derive_loan_status, derive_status, derive_transaction_metrics, tenure_days},
    error::GenResult,
    merchant::{merchant_id_for, Merchant},
    name_generator::NameGenerator,
    rng::{GenRng, RngBank, StageSlot},
    sampler::{sample_acquisition_channel, sample_category, sample_device_type, sample_location, sample_onboarding_date},
};

pub struct MerchantAssembler<'a> {
    config: &'a GeneratorConfig,
    bank: &'a RngBank,
    names: NameGenerator,
    name_rng: GenRng,
}

impl<'a> MerchantAssembler<'a> {
    pub fn new(config: &'a GeneratorConfig, bank: &'a RngBank) -> Self {
        Self {
            config,
            bank,
            names: NameGenerator::new(),
            name_rng: bank.for_stage(StageSlot::Naming),
        }
    }

    /// Build `count` merchants. Zero yields an empty table.
    pub fn generate_merchants(&mut self, count: usize) -> GenResult<Vec<Merchant>> {
        let mut merchants = Vec::with_capacity(count);
        for index in 0..count {
            let name = self.names.generate_business_name(&mut self.name_rng)?;
            merchants.push(self.assemble(index, name));
        }
        Ok(merchants)
    }

    /// Derive every attribute of the `index`-th merchant.
    pub fn assemble(&self, index: usize, business_name: String) -> Merchant {
        let cfg = self.config;
        let mut rng = self.bank.for_merchant(StageSlot::Merchant, index);

        let location = sample_location(&mut rng, &cfg.geo);
        let (category, subcategory) = sample_category(&mut rng, &cfg.taxonomy);
        let acquisition_channel = sample_acquisition_channel(&mut rng, &cfg.taxonomy);
        let device_type = sample_device_type(&mut rng, &cfg.taxonomy);
        let onboarding_date = sample_onboarding_date(&mut rng, cfg.as_of, cfg.onboarding_window_days);
        let tenure = tenure_days(cfg.as_of, onboarding_date);

        let status = derive_status(&mut rng, cfg.as_of, onboarding_date, category);
        let metrics = derive_transaction_metrics(&mut rng, cfg.as_of, category, location.tier, onboarding_date);
        let adoption = derive_adoption(&mut rng, status.status, tenure, metrics.monthly_value);
        let loan = derive_loan_status(&mut rng, status.status, metrics.monthly_value);

        Merchant {
            merchant_id: merchant_id_for(index),
            business_name,
            business_category: category.name.clone(),
            subcategory: subcategory.to_string(),
            city: location.city,
            district: location.district,
            state: location.state,
            pin_code: location.pin_code,
            tier: location.tier,
            onboarding_date,
            acquisition_channel: acquisition_channel.to_string(),
            device_type: device_type.to_string(),
            active_status: status.status,
            last_transaction_date: status.last_transaction_date,
            qr_displayed: adoption.qr_displayed,
            soundbox_adopted: adoption.soundbox_adopted,
            swipe_machine: adoption.swipe_machine,
            loans_taken: loan.loans_taken,
            current_loan_status: loan.status,
            monthly_transaction_count: metrics.monthly_count,
            monthly_transaction_value: metrics.monthly_value,
            avg_ticket_size: metrics.avg_ticket,
        }
    }
}
