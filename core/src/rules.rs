//! Anomaly rule bank.
//!
//! A bank of independent, pure evaluators. Each takes pre-aggregated
//! account/transaction statistics plus the configured thresholds and
//! returns a flag and a coarse risk tier. Rules never touch the ledger,
//! hold no state, and draw no randomness: identical inputs always yield
//! identical verdicts. Composing multiple flagged rules into a case
//! score is the caller's concern.

use crate::config::RuleThresholds;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleVerdict {
    pub rule: &'static str,
    pub is_abnormal: bool,
    pub risk_level: RiskTier,
}

fn verdict(rule: &'static str, is_abnormal: bool) -> RuleVerdict {
    RuleVerdict {
        rule,
        is_abnormal,
        risk_level: if is_abnormal { RiskTier::High } else { RiskTier::Low },
    }
}

/// Transaction count and volume over one observation period.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodActivity {
    pub txn_count: u32,
    pub amount: f64,
}

/// Directional flow aggregates over an account's observation window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowStats {
    pub inflow_count: u32,
    pub outflow_count: u32,
    pub inflow_amount: f64,
    pub outflow_amount: f64,
    pub distinct_personal_counterparties: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Personal,
    Business,
}

pub struct RuleBank {
    thresholds: RuleThresholds,
}

impl RuleBank {
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RuleThresholds {
        &self.thresholds
    }

    /// Ratio with a zero-denominator guard: a legitimate zero
    /// denominator yields 0, which can never sit in the [0.9, 1.1]
    /// balance band, so the rule short-circuits to not-abnormal.
    fn ratio(numerator: f64, denominator: f64) -> f64 {
        if denominator == 0.0 {
            0.0
        } else {
            numerator / denominator
        }
    }

    fn ratio_in_band(&self, numerator: f64, denominator: f64) -> bool {
        let r = Self::ratio(numerator, denominator);
        r >= self.thresholds.ratio_min && r <= self.thresholds.ratio_max
    }

    fn has_keyword(&self, customer_name: &str) -> bool {
        let lowered = customer_name.to_lowercase();
        self.thresholds
            .sensitive_keywords
            .iter()
            .any(|kw| lowered.contains(&kw.to_lowercase()))
    }

    /// Burst of account openings with a large same-day aggregate outflow.
    pub fn account_burst_outflow(&self, new_accounts: u32, total_outflow: f64) -> RuleVerdict {
        let abnormal = new_accounts > self.thresholds.burst_account_count
            && total_outflow > self.thresholds.burst_outflow_total;
        verdict("account_burst_outflow", abnormal)
    }

    /// Business account whose counterparties within the rolling window
    /// are exclusively personal accounts, in quantity.
    pub fn private_concentration(
        &self,
        exclusively_personal: bool,
        distinct_personal: u32,
    ) -> RuleVerdict {
        let abnormal = exclusively_personal
            && distinct_personal > self.thresholds.concentration_counterparties;
        verdict("private_concentration", abnormal)
    }

    /// Cluster of business inflows followed promptly by an outflow.
    pub fn rapid_public_inflow(
        &self,
        inflow_count: u32,
        last_inflow_date: NaiveDate,
        outflow_date: NaiveDate,
    ) -> RuleVerdict {
        let gap_days = (outflow_date - last_inflow_date).num_days();
        let abnormal = inflow_count >= self.thresholds.rapid_inflow_count
            && gap_days <= self.thresholds.rapid_inflow_gap_days;
        verdict("rapid_public_inflow", abnormal)
    }

    /// Registered jurisdiction differs from the transaction jurisdiction.
    pub fn location_mismatch(&self, registered: &str, transacted: &str) -> RuleVerdict {
        verdict("location_mismatch", registered != transacted)
    }

    /// New account whose second 15-day period strictly outgrows the
    /// first in both count and volume, clearing absolute floors.
    pub fn activity_escalation(
        &self,
        early: PeriodActivity,
        late: PeriodActivity,
    ) -> RuleVerdict {
        let abnormal = late.txn_count > early.txn_count
            && late.amount > early.amount
            && late.txn_count >= self.thresholds.escalation_txn_count
            && late.amount >= self.thresholds.escalation_amount;
        verdict("activity_escalation", abnormal)
    }

    /// Near-balanced in/out turnover through an account left nearly empty.
    pub fn balanced_passthrough(
        &self,
        balance: f64,
        inflow_amount: f64,
        outflow_amount: f64,
    ) -> RuleVerdict {
        let abnormal = balance <= self.thresholds.passthrough_balance_ceiling
            && self.ratio_in_band(inflow_amount, outflow_amount)
            && inflow_amount.max(outflow_amount) >= self.thresholds.passthrough_turnover_floor;
        verdict("balanced_passthrough", abnormal)
    }

    /// Small inflow recurring on a tight cadence inside the lookback.
    /// `interval_min_days`/`interval_max_days` are the extremes of the
    /// gaps between matching inflows within the configured lookback.
    pub fn repeated_small_inflow(
        &self,
        inflow_amount: f64,
        interval_min_days: i64,
        interval_max_days: i64,
    ) -> RuleVerdict {
        let abnormal = inflow_amount <= self.thresholds.small_inflow_ceiling
            && interval_max_days - interval_min_days <= self.thresholds.small_inflow_spread_days;
        verdict("repeated_small_inflow", abnormal)
    }

    /// Keyword-flagged account with inflow-heavy pass-through traffic.
    pub fn keyword_inflow_passthrough(
        &self,
        customer_name: &str,
        flows: FlowStats,
    ) -> RuleVerdict {
        let abnormal = self.has_keyword(customer_name)
            && Self::ratio(flows.inflow_count as f64, flows.outflow_count as f64)
                >= self.thresholds.keyword_count_ratio
            && flows.inflow_amount >= self.thresholds.keyword_inflow_floor
            && self.ratio_in_band(flows.inflow_amount, flows.outflow_amount)
            && flows.distinct_personal_counterparties >= self.thresholds.keyword_counterparties;
        verdict("keyword_inflow_passthrough", abnormal)
    }

    /// Keyword-flagged account with outflow-heavy pass-through traffic.
    pub fn keyword_outflow_passthrough(
        &self,
        customer_name: &str,
        flows: FlowStats,
    ) -> RuleVerdict {
        let abnormal = self.has_keyword(customer_name)
            && Self::ratio(flows.outflow_count as f64, flows.inflow_count as f64)
                >= self.thresholds.keyword_count_ratio
            && flows.inflow_amount >= self.thresholds.keyword_outflow_floor
            && self.ratio_in_band(flows.inflow_amount, flows.outflow_amount)
            && flows.distinct_personal_counterparties >= self.thresholds.keyword_counterparties;
        verdict("keyword_outflow_passthrough", abnormal)
    }

    /// Heavy balanced turnover through a near-empty account, with a
    /// type-dependent balance ceiling. Business accounts must also
    /// match the sensitive-keyword set.
    pub fn low_balance_turnover(
        &self,
        kind: AccountKind,
        customer_name: &str,
        balance: f64,
        flows: FlowStats,
        txn_count: u32,
    ) -> RuleVerdict {
        let ceiling = match kind {
            AccountKind::Personal => self.thresholds.turnover_private_balance_ceiling,
            AccountKind::Business => self.thresholds.turnover_business_balance_ceiling,
        };
        let keyword_ok = match kind {
            AccountKind::Personal => true,
            AccountKind::Business => self.has_keyword(customer_name),
        };
        let abnormal = keyword_ok
            && balance <= ceiling
            && flows.inflow_amount >= self.thresholds.turnover_amount_floor
            && self.ratio_in_band(flows.inflow_amount, flows.outflow_amount)
            && txn_count >= self.thresholds.turnover_txn_count;
        verdict("low_balance_turnover", abnormal)
    }
}
