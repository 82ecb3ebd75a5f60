//! Structuring ("smurfing") sub-history generator.
//!
//! Builds one internally consistent suspicious history for a single
//! (account, counterparty) pair: a large round-number outflow, then a
//! run of small near-threshold inflows on a low-variance monthly
//! cadence, then partial rebate flows back out. The batch is the only
//! generator output that is guaranteed sorted by timestamp; its
//! realism depends on the causal sequence.

use crate::{
    config::StructuringSettings,
    entity::Person,
    error::{SimError, SimResult},
    patterns::execute_transfer,
    record::{TransactionRecord, TransferKind},
    rng::StreamRng,
    types::round_cents,
};
use chrono::{Duration, NaiveDateTime};

pub struct StructuringSimulator {
    settings: StructuringSettings,
}

impl StructuringSimulator {
    pub fn new(settings: StructuringSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &StructuringSettings {
        &self.settings
    }

    /// Draw the inter-arrival intervals: one per cycle, uniform in
    /// [28, 31] days, resampling the whole set until the spread meets
    /// the y-threshold. The retry count is bounded; exhausting it is an
    /// explicit error, never a silent fallback.
    pub fn draw_intervals(&self, rng: &mut StreamRng) -> SimResult<Vec<i64>> {
        if self.settings.num_cycles == 0 {
            return Ok(Vec::new());
        }
        for _ in 0..self.settings.max_resample_attempts {
            let intervals: Vec<i64> = (0..self.settings.num_cycles)
                .map(|_| rng.int_between(28, 31))
                .collect();
            let min = intervals.iter().min().copied().unwrap_or(0);
            let max = intervals.iter().max().copied().unwrap_or(0);
            if max - min <= self.settings.y_threshold_days {
                return Ok(intervals);
            }
        }
        Err(SimError::IntervalConstraint {
            limit: self.settings.y_threshold_days,
            attempts: self.settings.max_resample_attempts,
        })
    }

    /// Generate the full sub-history. `anchor` dates the first inflow
    /// cycle; the antecedent outflow lands 60 days before it.
    ///
    /// Every transfer still goes through the shared card-selection and
    /// balance-conservation path: a draw that cannot settle is omitted
    /// from the batch, and a rebate step with no eligible prior amount
    /// is skipped rather than failed.
    pub fn generate(
        &self,
        account: &mut Person,
        counterparty: &mut Person,
        base_amount: f64,
        anchor: NaiveDateTime,
        rng: &mut StreamRng,
    ) -> SimResult<Vec<TransactionRecord>> {
        let settings = &self.settings;
        let small_amount = round_cents((0.3 * base_amount).min(settings.x_threshold));
        let intervals = self.draw_intervals(rng)?;

        let mut batch: Vec<TransactionRecord> = Vec::new();

        // Antecedent cash-out: a round-number multiple of the base,
        // later replenished piecemeal.
        let initial_amount = round_cents(base_amount * rng.int_between(1, 5) as f64);
        let initial_ts = anchor - Duration::days(60);
        if let Some(record) = execute_transfer(
            account,
            counterparty,
            initial_amount,
            initial_ts,
            TransferKind::RegularTransfer,
            settings.risk,
            rng,
        ) {
            batch.push(record);
        }

        // One inflow per interval, each a small-integer multiple of
        // the per-cycle amount. The multiples leave a detectable
        // amount-ratio relationship between records.
        let mut cursor = anchor;
        let mut last_event = anchor;
        for (i, gap) in intervals.iter().enumerate() {
            let amount = round_cents(small_amount * rng.int_between(1, 3) as f64);
            if let Some(record) = execute_transfer(
                counterparty,
                account,
                amount,
                cursor,
                TransferKind::RegularTransfer,
                settings.risk,
                rng,
            ) {
                batch.push(record);
            }
            last_event = cursor;
            if i + 1 < intervals.len() {
                cursor += Duration::days(*gap);
            }
        }

        // Partial return flows, each in ratio to a previously emitted
        // near-threshold amount, trailing the inflow run.
        let rebate_count = (settings.num_cycles + 1) / 2;
        for _ in 0..rebate_count {
            let eligible: Vec<f64> = batch
                .iter()
                .map(|r| r.amount)
                .filter(|&a| a <= settings.x_threshold)
                .collect();
            let Some(&seed_amount) = rng.pick(&eligible) else {
                continue;
            };
            let amount = round_cents(seed_amount * rng.uniform(0.5, 1.5));
            let timestamp = last_event + Duration::days(rng.int_between(5, 10));
            if let Some(record) = execute_transfer(
                account,
                counterparty,
                amount,
                timestamp,
                TransferKind::RegularTransfer,
                settings.risk,
                rng,
            ) {
                batch.push(record);
            }
            last_event = timestamp;
        }

        batch.sort_by_key(|r| r.timestamp);
        log::debug!(
            "structuring: {} records for {} <-> {} (base {base_amount:.2})",
            batch.len(),
            account.person_id,
            counterparty.person_id
        );
        Ok(batch)
    }
}
