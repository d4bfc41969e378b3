use super::DatasetStore;
use crate::{
    enrichment::EnrichedMerchant,
    error::GenResult,
    merchant::{Merchant, MerchantRow},
};
use rusqlite::params;

impl DatasetStore {
    // ── Merchant ──────────────────────────────────────────────────

    pub fn insert_merchants(&self, run_id: &str, merchants: &[Merchant]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO merchant (
                    run_id, merchant_id, business_name, business_category, subcategory,
                    city, district, state, pin_code, tier, onboarding_date,
                    acquisition_channel, device_type, active_status, last_transaction_date,
                    qr_displayed, soundbox_adopted, swipe_machine, loans_taken,
                    current_loan_status, monthly_transaction_count,
                    monthly_transaction_value, avg_ticket_size
                ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23)",
            )?;
            for m in merchants {
                let r = MerchantRow::from(m);
                stmt.execute(params![
                    run_id, r.merchant_id, r.business_name, r.business_category, r.subcategory,
                    r.city, r.district, r.state, r.pin_code, r.tier, r.onboarding_date,
                    r.acquisition_channel, r.device_type, r.active_status, r.last_transaction_date,
                    r.qr_displayed, r.soundbox_adopted, r.swipe_machine, r.loans_taken,
                    r.current_loan_status, r.monthly_transaction_count,
                    r.monthly_transaction_value, r.avg_ticket_size,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Merchant rows of a run, in id order.
    pub fn merchants(&self, run_id: &str) -> GenResult<Vec<MerchantRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT merchant_id, business_name, business_category, subcategory,
                    city, district, state, pin_code, tier, onboarding_date,
                    acquisition_channel, device_type, active_status, last_transaction_date,
                    qr_displayed, soundbox_adopted, swipe_machine, loans_taken,
                    current_loan_status, monthly_transaction_count,
                    monthly_transaction_value, avg_ticket_size
             FROM merchant WHERE run_id = ?1 ORDER BY merchant_id ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(MerchantRow {
                merchant_id: row.get(0)?,
                business_name: row.get(1)?,
                business_category: row.get(2)?,
                subcategory: row.get(3)?,
                city: row.get(4)?,
                district: row.get(5)?,
                state: row.get(6)?,
                pin_code: row.get(7)?,
                tier: row.get(8)?,
                onboarding_date: row.get(9)?,
                acquisition_channel: row.get(10)?,
                device_type: row.get(11)?,
                active_status: row.get(12)?,
                last_transaction_date: row.get(13)?,
                qr_displayed: row.get(14)?,
                soundbox_adopted: row.get(15)?,
                swipe_machine: row.get(16)?,
                loans_taken: row.get(17)?,
                current_loan_status: row.get(18)?,
                monthly_transaction_count: row.get(19)?,
                monthly_transaction_value: row.get(20)?,
                avg_ticket_size: row.get(21)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn merchant_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("merchant", run_id)
    }

    /// (active_status, merchants) pairs, largest group first.
    pub fn status_counts(&self, run_id: &str) -> GenResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT active_status, COUNT(*) FROM merchant WHERE run_id = ?1
             GROUP BY active_status ORDER BY COUNT(*) DESC, active_status ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |r| Ok((r.get(0)?, r.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Share of merchants with each adoption flag set: (qr, soundbox, swipe).
    pub fn adoption_rates(&self, run_id: &str) -> GenResult<(f64, f64, f64)> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(AVG(qr_displayed = 'Yes'), 0.0),
                    COALESCE(AVG(soundbox_adopted = 'Yes'), 0.0),
                    COALESCE(AVG(swipe_machine = 'Yes'), 0.0)
             FROM merchant WHERE run_id = ?1",
            params![run_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?)
    }

    // ── Enriched view ─────────────────────────────────────────────

    pub fn insert_enriched(&self, run_id: &str, rows: &[EnrichedMerchant]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO merchant_enriched (
                    run_id, merchant_id, market_penetration, competitive_intensity,
                    tenure_days, days_since_last_txn, products_adopted, size_band
                ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            )?;
            for e in rows {
                stmt.execute(params![
                    run_id,
                    e.merchant.merchant_id,
                    e.market_penetration,
                    e.competitive_intensity,
                    e.tenure_days,
                    e.days_since_last_txn,
                    e.products_adopted,
                    e.size_band,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn enriched_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("merchant_enriched", run_id)
    }
}
