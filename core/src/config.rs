//! Run configuration: date window, pattern mix, structuring parameters,
//! and every rule-bank threshold.
//!
//! Load from a JSON file for real runs; `SimConfig::default()` carries
//! the documented defaults and is what tests use.

use crate::record::RiskTag;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn start_at_midnight(&self) -> NaiveDateTime {
        self.start.and_hms_opt(0, 0, 0).expect("midnight is valid")
    }

    pub fn end_of_day(&self) -> NaiveDateTime {
        self.end.and_hms_opt(23, 59, 59).expect("end of day is valid")
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date"),
        }
    }
}

/// Inclusive count range a pattern draws its batch size from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Settings for one of the five banded two-party patterns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandSettings {
    pub count: CountRange,
    #[serde(default)]
    pub risk: RiskTag,
}

/// Settings for the multi-party split pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitSettings {
    pub participants: CountRange,
    pub share_min: f64,
    pub share_max: f64,
    #[serde(default)]
    pub risk: RiskTag,
}

/// Relative weights for the per-round pattern selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MixWeights {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
    pub investment: f64,
    pub frequent_large: f64,
    pub split: f64,
}

impl Default for MixWeights {
    fn default() -> Self {
        Self {
            small: 0.54,
            medium: 0.30,
            large: 0.07,
            investment: 0.03,
            frequent_large: 0.01,
            split: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSettings {
    pub small: BandSettings,
    pub medium: BandSettings,
    pub large: BandSettings,
    pub investment: BandSettings,
    pub frequent_large: BandSettings,
    pub split: SplitSettings,
    #[serde(default)]
    pub mix_weights: MixWeights,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            small: BandSettings { count: CountRange::new(20, 50), risk: RiskTag::None },
            medium: BandSettings { count: CountRange::new(5, 15), risk: RiskTag::None },
            large: BandSettings { count: CountRange::new(1, 3), risk: RiskTag::None },
            investment: BandSettings { count: CountRange::new(3, 8), risk: RiskTag::None },
            frequent_large: BandSettings { count: CountRange::new(15, 30), risk: RiskTag::None },
            split: SplitSettings {
                participants: CountRange::new(3, 10),
                share_min: 60.0,
                share_max: 2000.0,
                risk: RiskTag::None,
            },
            mix_weights: MixWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuringSettings {
    /// Ceiling on the per-cycle inflow base amount.
    pub x_threshold: f64,
    /// Maximum spread between the longest and shortest inter-arrival
    /// interval, in days.
    pub y_threshold_days: i64,
    /// Number of inflow cycles.
    pub num_cycles: u32,
    /// Bound on whole-set interval resampling before giving up.
    pub max_resample_attempts: u32,
    pub risk: RiskTag,
}

impl Default for StructuringSettings {
    fn default() -> Self {
        Self {
            x_threshold: 3000.0,
            y_threshold_days: 3,
            num_cycles: 6,
            max_resample_attempts: 64,
            risk: RiskTag::High,
        }
    }
}

/// Every rule-bank parameter. Nothing in the rule bank is hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleThresholds {
    pub burst_account_count: u32,
    pub burst_outflow_total: f64,
    pub concentration_window_days: i64,
    pub concentration_counterparties: u32,
    pub rapid_inflow_count: u32,
    pub rapid_inflow_gap_days: i64,
    pub escalation_txn_count: u32,
    pub escalation_amount: f64,
    pub passthrough_balance_ceiling: f64,
    pub ratio_min: f64,
    pub ratio_max: f64,
    pub passthrough_turnover_floor: f64,
    pub small_inflow_ceiling: f64,
    pub small_inflow_lookback_days: i64,
    pub small_inflow_spread_days: i64,
    pub keyword_count_ratio: f64,
    pub keyword_inflow_floor: f64,
    pub keyword_outflow_floor: f64,
    pub keyword_counterparties: u32,
    pub turnover_private_balance_ceiling: f64,
    pub turnover_business_balance_ceiling: f64,
    pub turnover_amount_floor: f64,
    pub turnover_txn_count: u32,
    pub sensitive_keywords: Vec<String>,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            burst_account_count: 10,
            burst_outflow_total: 100_000.0,
            concentration_window_days: 10,
            concentration_counterparties: 10,
            rapid_inflow_count: 20,
            rapid_inflow_gap_days: 2,
            escalation_txn_count: 30,
            escalation_amount: 500_000.0,
            passthrough_balance_ceiling: 100.0,
            ratio_min: 0.9,
            ratio_max: 1.1,
            passthrough_turnover_floor: 200_000.0,
            small_inflow_ceiling: 3_000.0,
            small_inflow_lookback_days: 180,
            small_inflow_spread_days: 3,
            keyword_count_ratio: 5.0,
            keyword_inflow_floor: 500_000.0,
            keyword_outflow_floor: 200_000.0,
            keyword_counterparties: 10,
            turnover_private_balance_ceiling: 1_000.0,
            turnover_business_balance_ceiling: 10_000.0,
            turnover_amount_floor: 200_000.0,
            turnover_txn_count: 10,
            sensitive_keywords: [
                "investment",
                "wealth management",
                "asset management",
                "capital",
                "guarantee",
                "consulting",
                "pension",
                "exchange",
                "fund",
                "equity",
                "financial services",
                "financial information",
                "network technology",
                "e-commerce",
                "biotech",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub window: DateWindow,
    #[serde(default)]
    pub patterns: PatternSettings,
    #[serde(default)]
    pub structuring: StructuringSettings,
    #[serde(default)]
    pub rules: RuleThresholds,
}

impl SimConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_documented_values() {
        let config = SimConfig::default();
        assert_eq!(config.patterns.small.count.min, 20);
        assert_eq!(config.patterns.small.count.max, 50);
        assert_eq!(config.structuring.x_threshold, 3000.0);
        assert_eq!(config.structuring.num_cycles, 6);
        assert_eq!(config.rules.rapid_inflow_count, 20);
        assert_eq!(config.rules.ratio_min, 0.9);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"structuring": {"x_threshold": 5000.0, "y_threshold_days": 2, "num_cycles": 4, "max_resample_attempts": 16, "risk": "high"}}"#)
                .unwrap();
        assert_eq!(config.structuring.x_threshold, 5000.0);
        assert_eq!(config.patterns.medium.count.max, 15);
    }
}
