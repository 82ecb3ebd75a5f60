//! The emitted transaction record — immutable, append-only.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Tag naming the behavioral pattern a record was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    SmallTransfer,
    MediumTransfer,
    LargeTransfer,
    InvestmentTransfer,
    FrequentLargeTransfer,
    AaPayment,
    RegularTransfer,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SmallTransfer => "small_transfer",
            Self::MediumTransfer => "medium_transfer",
            Self::LargeTransfer => "large_transfer",
            Self::InvestmentTransfer => "investment_transfer",
            Self::FrequentLargeTransfer => "frequent_large_transfer",
            Self::AaPayment => "aa_payment",
            Self::RegularTransfer => "regular_transfer",
        }
    }
}

/// Coarse risk classification attached to a record or a rule outcome.
/// Not a probability. "0" is the unlabeled default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiskTag {
    #[default]
    #[serde(rename = "0")]
    None,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
}

impl RiskTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "0",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One money movement between two cards. Created once, never mutated.
///
/// Old/new balances are recorded as 0 for non-consumer receiver cards:
/// settlement accounts move funds without exposing a running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub sender_id: String,
    pub sender_card_bank: String,
    pub sender_card_number: String,
    pub sender_card_balance_old: f64,
    pub sender_card_balance_new: f64,
    pub receiver_id: String,
    pub receiver_card_bank: String,
    pub receiver_card_number: String,
    pub receiver_card_balance_old: f64,
    pub receiver_card_balance_new: f64,
    pub amount: f64,
    #[serde(with = "ts_format")]
    pub timestamp: NaiveDateTime,
    pub transaction_type: TransferKind,
    pub risk_level: RiskTag,
}

/// The on-disk timestamp format of the output table:
/// `YYYY-MM-DD HH:MM:SS`, second precision.
pub mod ts_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
