//! Legitimate behavioral pattern generators.
//!
//! Each pattern draws a batch size, then per draw: an amount from the
//! pattern's distribution, a timestamp from the window sampler, and a
//! random card on each side, then applies one balance-conserving
//! transfer. Draws that cannot settle (a party with no cards, or an
//! insufficient strictly-positive sender balance) are dropped, so a
//! batch may be shorter than requested. Callers must not assume exact
//! cardinality.

use crate::{
    config::{BandSettings, CountRange, PatternSettings, SimConfig},
    entity::Person,
    error::SimResult,
    record::{RiskTag, TransactionRecord, TransferKind},
    rng::StreamRng,
    temporal::WindowSampler,
    types::round_cents,
};
use chrono::{Duration, NaiveDateTime};

/// Borrow two distinct elements of a slice mutably.
pub(crate) fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    assert!(i != j, "pair_mut needs distinct indices");
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Borrow a set of distinct indices of a slice mutably.
pub(crate) fn select_mut<'a, T>(items: &'a mut [T], indices: &[usize]) -> Vec<&'a mut T> {
    let mut slots: Vec<Option<&'a mut T>> = items.iter_mut().map(Some).collect();
    indices
        .iter()
        .map(|&i| slots[i].take().expect("indices must be distinct"))
        .collect()
}

/// Apply one transfer between a random card of each party and emit its
/// record, or return None when the draw must be skipped.
///
/// The sender's balance is read and written within this single step, so
/// no later transfer can observe a stale balance in a single-threaded
/// run. A transfer whose amount exceeds a strictly-positive sender
/// balance is skipped; senders at or below zero are treated as
/// settlement-style unlimited sources. Non-consumer receiver cards
/// still take the credit but record old/new balances as 0.
#[allow(clippy::too_many_arguments)]
pub fn execute_transfer(
    sender: &mut Person,
    receiver: &mut Person,
    amount: f64,
    timestamp: NaiveDateTime,
    kind: TransferKind,
    risk: RiskTag,
    rng: &mut StreamRng,
) -> Option<TransactionRecord> {
    if sender.cards.is_empty() || receiver.cards.is_empty() {
        return None;
    }
    let amount = round_cents(amount);
    let sender_idx = rng.next_u64_below(sender.cards.len() as u64) as usize;
    let receiver_idx = rng.next_u64_below(receiver.cards.len() as u64) as usize;

    let sender_card = &mut sender.cards[sender_idx];
    if amount > sender_card.balance() && sender_card.balance() > 0.0 {
        return None;
    }
    let sender_old = sender_card.balance();
    sender_card.debit(amount);
    let sender_new = sender_card.balance();
    let sender_bank = sender_card.bank_name.clone();
    let sender_number = sender_card.account_number.clone();

    let receiver_card = &mut receiver.cards[receiver_idx];
    let receiver_old = if receiver_card.is_consumer() {
        receiver_card.balance()
    } else {
        0.0
    };
    receiver_card.credit(amount);
    let receiver_new = if receiver_card.is_consumer() {
        receiver_card.balance()
    } else {
        0.0
    };

    Some(TransactionRecord {
        sender_id: sender.person_id.clone(),
        sender_card_bank: sender_bank,
        sender_card_number: sender_number,
        sender_card_balance_old: sender_old,
        sender_card_balance_new: sender_new,
        receiver_id: receiver.person_id.clone(),
        receiver_card_bank: receiver_card.bank_name.clone(),
        receiver_card_number: receiver_card.account_number.clone(),
        receiver_card_balance_old: receiver_old,
        receiver_card_balance_new: receiver_new,
        amount,
        timestamp,
        transaction_type: kind,
        risk_level: risk,
    })
}

pub struct PatternGenerator {
    sampler: WindowSampler,
    settings: PatternSettings,
}

impl PatternGenerator {
    pub fn new(sampler: WindowSampler, settings: PatternSettings) -> Self {
        Self { sampler, settings }
    }

    pub fn from_config(config: &SimConfig) -> SimResult<Self> {
        let sampler = WindowSampler::new(
            config.window.start_at_midnight(),
            config.window.end_of_day(),
        )?;
        Ok(Self::new(sampler, config.patterns.clone()))
    }

    pub fn settings(&self) -> &PatternSettings {
        &self.settings
    }

    fn batch_size(&self, range: CountRange, count: Option<u32>, rng: &mut StreamRng) -> u32 {
        count.unwrap_or_else(|| rng.int_between(range.min as i64, range.max as i64) as u32)
    }

    /// Shared driver for the five two-party banded patterns.
    #[allow(clippy::too_many_arguments)]
    fn run_banded<F>(
        &self,
        sender: &mut Person,
        receiver: &mut Person,
        kind: TransferKind,
        band: BandSettings,
        risk: RiskTag,
        count: Option<u32>,
        rng: &mut StreamRng,
        mut draw_amount: F,
    ) -> Vec<TransactionRecord>
    where
        F: FnMut(&mut StreamRng) -> f64,
    {
        let requested = self.batch_size(band.count, count, rng);
        let mut batch = Vec::with_capacity(requested as usize);
        for _ in 0..requested {
            let amount = draw_amount(rng);
            let timestamp = self.sampler.sample(rng);
            if let Some(record) =
                execute_transfer(sender, receiver, amount, timestamp, kind, risk, rng)
            {
                batch.push(record);
            }
        }
        log::debug!(
            "{}: emitted {}/{} for {} -> {}",
            kind.as_str(),
            batch.len(),
            requested,
            sender.person_id,
            receiver.person_id
        );
        batch
    }

    /// Everyday payments: rent, utilities, daily spending.
    pub fn small_transfers(
        &self,
        sender: &mut Person,
        receiver: &mut Person,
        risk: RiskTag,
        count: Option<u32>,
        rng: &mut StreamRng,
    ) -> Vec<TransactionRecord> {
        let band = self.settings.small;
        self.run_banded(sender, receiver, TransferKind::SmallTransfer, band, risk, count, rng, |r| {
            r.uniform(100.0, 2_000.0)
        })
    }

    /// Mid-size purchases: shopping, renovation, electronics.
    pub fn medium_transfers(
        &self,
        sender: &mut Person,
        receiver: &mut Person,
        risk: RiskTag,
        count: Option<u32>,
        rng: &mut StreamRng,
    ) -> Vec<TransactionRecord> {
        let band = self.settings.medium;
        self.run_banded(sender, receiver, TransferKind::MediumTransfer, band, risk, count, rng, |r| {
            r.uniform(2_000.0, 20_000.0)
        })
    }

    /// Rare large outlays: down payments, vehicles.
    pub fn large_transfers(
        &self,
        sender: &mut Person,
        receiver: &mut Person,
        risk: RiskTag,
        count: Option<u32>,
        rng: &mut StreamRng,
    ) -> Vec<TransactionRecord> {
        let band = self.settings.large;
        self.run_banded(sender, receiver, TransferKind::LargeTransfer, band, risk, count, rng, |r| {
            r.uniform(20_000.0, 200_000.0)
        })
    }

    /// Investment flows. Log-normal amounts: right-skewed, with most
    /// mass in the 50k–200k range.
    pub fn investment_transfers(
        &self,
        sender: &mut Person,
        receiver: &mut Person,
        risk: RiskTag,
        count: Option<u32>,
        rng: &mut StreamRng,
    ) -> Vec<TransactionRecord> {
        let band = self.settings.investment;
        self.run_banded(
            sender,
            receiver,
            TransferKind::InvestmentTransfer,
            band,
            risk,
            count,
            rng,
            |r| r.log_normal(11.0, 1.0),
        )
    }

    /// High-frequency large transfers: business operating flows.
    pub fn frequent_large_transfers(
        &self,
        sender: &mut Person,
        receiver: &mut Person,
        risk: RiskTag,
        count: Option<u32>,
        rng: &mut StreamRng,
    ) -> Vec<TransactionRecord> {
        let band = self.settings.frequent_large;
        self.run_banded(
            sender,
            receiver,
            TransferKind::FrequentLargeTransfer,
            band,
            risk,
            count,
            rng,
            |r| r.uniform(50_000.0, 500_000.0),
        )
    }

    /// Group cost-sharing: one participant is drawn as the payer, every
    /// other participant transfers the same per-person share to them.
    /// All transfers share one base timestamp plus 1–60 minutes of
    /// jitter so the batch is near-simultaneous without an
    /// exact-timestamp artifact.
    pub fn aa_payments(
        &self,
        participants: &mut [&mut Person],
        share: f64,
        risk: RiskTag,
        rng: &mut StreamRng,
    ) -> Vec<TransactionRecord> {
        if participants.len() < 2 {
            return Vec::new();
        }
        let share = round_cents(share);
        let base = self.sampler.sample(rng);
        let payer_idx = rng.next_u64_below(participants.len() as u64) as usize;

        let mut batch = Vec::with_capacity(participants.len() - 1);
        for i in 0..participants.len() {
            if i == payer_idx {
                continue;
            }
            let timestamp = base + Duration::minutes(rng.int_between(1, 60));
            let (sender, payer) = pair_mut(participants, i, payer_idx);
            if let Some(record) = execute_transfer(
                sender,
                payer,
                share,
                timestamp,
                TransferKind::AaPayment,
                risk,
                rng,
            ) {
                batch.push(record);
            }
        }
        batch
    }
}
