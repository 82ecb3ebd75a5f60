//! Run orchestration.
//!
//! RULES:
//!   - The engine owns the RNG bank; every component draws from its own
//!     stream, so adding a component never perturbs another's output.
//!   - Entities are created before a run and only their card balances
//!     mutate during it; transaction records are append-only.
//!   - The run is single-threaded and synchronous: each transfer reads
//!     and writes its sender/receiver balances within one step, so no
//!     record can observe a stale balance.

use crate::{
    config::SimConfig,
    entity::Person,
    error::SimResult,
    patterns::{pair_mut, select_mut, PatternGenerator},
    rng::{RngBank, StreamRng, StreamSlot},
    structuring::StructuringSimulator,
    types::Ledger,
};
use chrono::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PatternChoice {
    Small,
    Medium,
    Large,
    Investment,
    FrequentLarge,
    Split,
}

pub struct SimEngine {
    config: SimConfig,
    rng_bank: RngBank,
    seed: u64,
}

impl SimEngine {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self {
            rng_bank: RngBank::new(seed),
            config,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run the legitimate pattern mix: each round picks a pattern by
    /// weight and distinct parties, then appends the generated batch to
    /// the run ledger. Concatenation order is generation order; only
    /// structuring batches are internally time-sorted.
    pub fn run(&self, population: &mut [Person], rounds: u32) -> SimResult<Ledger> {
        let mut ledger = Ledger::new();
        if population.len() < 2 {
            log::warn!("population of {} cannot trade; empty ledger", population.len());
            return Ok(ledger);
        }

        let generator = PatternGenerator::from_config(&self.config)?;
        let mut rng = self.rng_bank.for_stream(StreamSlot::Patterns);
        let weights = self.config.patterns.mix_weights;
        let mix = [
            (PatternChoice::Small, weights.small),
            (PatternChoice::Medium, weights.medium),
            (PatternChoice::Large, weights.large),
            (PatternChoice::Investment, weights.investment),
            (PatternChoice::FrequentLarge, weights.frequent_large),
            (PatternChoice::Split, weights.split),
        ];

        for _ in 0..rounds {
            let choice = *rng.weighted_pick(&mix);

            if choice == PatternChoice::Split {
                let split = self.config.patterns.split;
                let wanted = rng
                    .int_between(split.participants.min as i64, split.participants.max as i64)
                    as usize;
                let group_size = wanted.min(population.len());
                if group_size < 2 {
                    continue;
                }
                let indices = rng.sample_distinct(population.len(), group_size);
                let mut parties = select_mut(population, &indices);
                let share = rng.uniform(split.share_min, split.share_max);
                ledger.extend(generator.aa_payments(&mut parties, share, split.risk, &mut rng));
                continue;
            }

            let sender_idx = rng.next_u64_below(population.len() as u64) as usize;
            let mut receiver_idx = rng.next_u64_below(population.len() as u64) as usize;
            while receiver_idx == sender_idx {
                receiver_idx = rng.next_u64_below(population.len() as u64) as usize;
            }
            let (sender, receiver) = pair_mut(population, sender_idx, receiver_idx);

            let patterns = &self.config.patterns;
            let batch = match choice {
                PatternChoice::Small => {
                    generator.small_transfers(sender, receiver, patterns.small.risk, None, &mut rng)
                }
                PatternChoice::Medium => generator.medium_transfers(
                    sender,
                    receiver,
                    patterns.medium.risk,
                    None,
                    &mut rng,
                ),
                PatternChoice::Large => {
                    generator.large_transfers(sender, receiver, patterns.large.risk, None, &mut rng)
                }
                PatternChoice::Investment => generator.investment_transfers(
                    sender,
                    receiver,
                    patterns.investment.risk,
                    None,
                    &mut rng,
                ),
                PatternChoice::FrequentLarge => generator.frequent_large_transfers(
                    sender,
                    receiver,
                    patterns.frequent_large.risk,
                    None,
                    &mut rng,
                ),
                PatternChoice::Split => unreachable!("split handled above"),
            };
            ledger.extend(batch);
        }

        log::info!("pattern mix: {} records over {rounds} rounds", ledger.len());
        Ok(ledger)
    }

    /// Generate one structuring sub-history per explicit
    /// (account, counterparty) index pair.
    pub fn run_structuring(
        &self,
        population: &mut [Person],
        pairs: &[(usize, usize)],
        base_amount: f64,
    ) -> SimResult<Ledger> {
        let mut rng = self.rng_bank.for_stream(StreamSlot::Structuring);
        self.structuring_for_pairs(population, pairs, base_amount, &mut rng)
    }

    /// Sample `count` distinct pairs from the population and generate a
    /// structuring sub-history for each.
    pub fn run_structuring_random(
        &self,
        population: &mut [Person],
        count: usize,
        base_amount: f64,
    ) -> SimResult<Ledger> {
        if population.len() < 2 {
            return Ok(Ledger::new());
        }
        let mut rng = self.rng_bank.for_stream(StreamSlot::Structuring);
        let pairs: Vec<(usize, usize)> = (0..count)
            .map(|_| {
                let drawn = rng.sample_distinct(population.len(), 2);
                (drawn[0], drawn[1])
            })
            .collect();
        self.structuring_for_pairs(population, &pairs, base_amount, &mut rng)
    }

    fn structuring_for_pairs(
        &self,
        population: &mut [Person],
        pairs: &[(usize, usize)],
        base_amount: f64,
        rng: &mut StreamRng,
    ) -> SimResult<Ledger> {
        let simulator = StructuringSimulator::new(self.config.structuring.clone());
        let start = self.config.window.start_at_midnight();
        let end = self.config.window.end_of_day();
        let span_days = (end - start).num_days();

        let mut ledger = Ledger::new();
        for &(account_idx, counterparty_idx) in pairs {
            if account_idx == counterparty_idx
                || account_idx >= population.len()
                || counterparty_idx >= population.len()
            {
                log::warn!("skipping invalid structuring pair ({account_idx}, {counterparty_idx})");
                continue;
            }

            // Anchor the first inflow cycle at least 60 days into the
            // window so the antecedent outflow stays inside it, and
            // leave tail room for the inflow/rebate run where the span
            // allows.
            let lo = 60.min(span_days);
            let hi = (span_days - 210).max(lo);
            let anchor_day = rng.int_between(lo, hi);
            let anchor_second = rng.int_between(9 * 3600, 18 * 3600 - 1);
            let anchor = start + Duration::days(anchor_day) + Duration::seconds(anchor_second);

            let (account, counterparty) = pair_mut(population, account_idx, counterparty_idx);
            let batch = simulator.generate(account, counterparty, base_amount, anchor, rng)?;
            ledger.extend(batch);
        }
        Ok(ledger)
    }
}
