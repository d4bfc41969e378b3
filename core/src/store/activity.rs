use super::DatasetStore;
use crate::{
    error::GenResult,
    interactions::{InteractionRecord, InteractionRow},
    loans::{LoanRecord, LoanRow},
    merchant::{FeatureUsageRecord, FeatureUsageRow},
    transactions::{TransactionRecord, TransactionRow},
};
use rusqlite::params;

impl DatasetStore {
    // ── feature_usage ─────────────────────────────────────────────────────

    pub fn insert_feature_usage(&self, run_id: &str, rows: &[FeatureUsageRecord]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO feature_usage (run_id, merchant_id, feature, is_used, monthly_frequency)
                 VALUES (?1,?2,?3,?4,?5)",
            )?;
            for r in rows.iter().map(FeatureUsageRow::from) {
                stmt.execute(params![run_id, r.merchant_id, r.feature, r.is_used, r.monthly_frequency])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn feature_usage(&self, run_id: &str) -> GenResult<Vec<FeatureUsageRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT merchant_id, feature, is_used, monthly_frequency
             FROM feature_usage WHERE run_id = ?1 ORDER BY merchant_id, feature",
        )?;
        let rows = stmt.query_map(params![run_id], |r| {
            Ok(FeatureUsageRow {
                merchant_id: r.get(0)?,
                feature: r.get(1)?,
                is_used: r.get(2)?,
                monthly_frequency: r.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── txn ───────────────────────────────────────────────────────────────

    pub fn insert_transactions(&self, run_id: &str, rows: &[TransactionRecord]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO txn (run_id, transaction_id, merchant_id, transaction_date, amount, payment_method)
                 VALUES (?1,?2,?3,?4,?5,?6)",
            )?;
            for t in rows.iter().map(TransactionRow::from) {
                stmt.execute(params![
                    run_id, t.transaction_id, t.merchant_id, t.transaction_date, t.amount, t.payment_method,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn txn_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("txn", run_id)
    }

    /// (payment_method, transactions) pairs, alphabetical.
    pub fn payment_method_counts(&self, run_id: &str) -> GenResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT payment_method, COUNT(*) FROM txn WHERE run_id = ?1
             GROUP BY payment_method ORDER BY payment_method ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |r| Ok((r.get(0)?, r.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── interaction ───────────────────────────────────────────────────────

    pub fn insert_interactions(&self, run_id: &str, rows: &[InteractionRecord]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO interaction (
                     run_id, interaction_id, merchant_id, date, interaction_type,
                     channel, resolution_time_days, satisfaction_score
                 ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            )?;
            for i in rows.iter().map(InteractionRow::from) {
                stmt.execute(params![
                    run_id, i.interaction_id, i.merchant_id, i.date, i.interaction_type,
                    i.channel, i.resolution_time_days, i.satisfaction_score,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn interaction_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("interaction", run_id)
    }

    // ── loan ──────────────────────────────────────────────────────────────

    pub fn insert_loans(&self, run_id: &str, rows: &[LoanRecord]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO loan (
                     run_id, loan_id, merchant_id, loan_type, loan_amount,
                     interest_rate, approval_date, end_date, status
                 ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            )?;
            for l in rows.iter().map(LoanRow::from) {
                stmt.execute(params![
                    run_id, l.loan_id, l.merchant_id, l.loan_type, l.loan_amount,
                    l.interest_rate, l.approval_date, l.end_date, l.status,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn loans(&self, run_id: &str) -> GenResult<Vec<LoanRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT loan_id, merchant_id, loan_type, loan_amount, interest_rate,
                    approval_date, end_date, status
             FROM loan WHERE run_id = ?1 ORDER BY loan_id",
        )?;
        let rows = stmt.query_map(params![run_id], |r| {
            Ok(LoanRow {
                loan_id: r.get(0)?,
                merchant_id: r.get(1)?,
                loan_type: r.get(2)?,
                loan_amount: r.get(3)?,
                interest_rate: r.get(4)?,
                approval_date: r.get(5)?,
                end_date: r.get(6)?,
                status: r.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn loan_count(&self, run_id: &str) -> GenResult<i64> {
        self.count_rows("loan", run_id)
    }
}
