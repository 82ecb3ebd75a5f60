//! Entity model: persons and the bank cards they hold.
//!
//! Ownership direction is Person → cards. A card carries its owner's id
//! as a plain back-reference for display and lookup, never a cyclic
//! pointer.
//!
//! RULE: a card's balance is the authoritative source of truth and is
//! rounded to 2 decimal places on every mutation. All reads and writes
//! go through the accessors below.

use crate::{
    error::SimError,
    rng::StreamRng,
    types::{round_cents, PersonId},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Card classification. Consumer cards track and report a running
/// balance; settlement cards move funds but always report balance 0 on
/// emitted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Consumer,
    Settlement,
}

impl CardType {
    /// One-letter type code, the first character of the account number.
    pub fn code(&self) -> char {
        match self {
            Self::Consumer => 'C',
            Self::Settlement => 'S',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeTier {
    Low,
    Middle,
    High,
}

impl IncomeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Middle => "middle",
            Self::High => "high",
        }
    }
}

impl FromStr for IncomeTier {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "middle" => Ok(Self::Middle),
            "high" => Ok(Self::High),
            other => Err(SimError::InvalidIncomeTier(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighSchool => "high_school",
            Self::Associate => "associate",
            Self::Bachelor => "bachelor",
            Self::Master => "master",
            Self::Doctorate => "doctorate",
        }
    }
}

impl FromStr for EducationLevel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high_school" => Ok(Self::HighSchool),
            "associate" => Ok(Self::Associate),
            "bachelor" => Ok(Self::Bachelor),
            "master" => Ok(Self::Master),
            "doctorate" => Ok(Self::Doctorate),
            other => Err(SimError::InvalidEducation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
            Self::Divorced => "divorced",
        }
    }
}

/// A bank card. Balance is private so that rounding cannot be bypassed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankCard {
    pub owner_id: PersonId,
    pub bank_name: String,
    pub account_number: String,
    pub card_type: CardType,
    balance: f64,
}

impl BankCard {
    pub fn new(owner_id: PersonId, bank_name: &str, card_type: CardType, balance: f64) -> Self {
        Self {
            owner_id,
            bank_name: bank_name.to_string(),
            account_number: String::new(),
            card_type,
            balance: round_cents(balance),
        }
    }

    /// Assign a fresh account number: 1-letter type code + 8 digits.
    pub fn issue_number(mut self, rng: &mut StreamRng) -> Self {
        let digits: String = (0..8)
            .map(|_| char::from(b'0' + rng.next_u64_below(10) as u8))
            .collect();
        self.account_number = format!("{}{digits}", self.card_type.code());
        self
    }

    pub fn with_number(mut self, account_number: &str) -> Self {
        self.account_number = account_number.to_string();
        self
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn is_consumer(&self) -> bool {
        self.card_type == CardType::Consumer
    }

    /// Add funds. Rounds the resulting balance.
    pub fn credit(&mut self, amount: f64) {
        self.balance = round_cents(self.balance + amount);
    }

    /// Remove funds. Rounds the resulting balance. The caller enforces
    /// the insufficient-balance skip; settlement-style senders with a
    /// non-positive balance are allowed to go further negative.
    pub fn debit(&mut self, amount: f64) {
        self.balance = round_cents(self.balance - amount);
    }
}

/// A member of the simulated population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub person_id: PersonId,
    pub name: String,
    pub gender: String,
    pub age: u32,
    pub occupation: String,
    pub income_tier: IncomeTier,
    pub monthly_income: f64,
    pub marital_status: MaritalStatus,
    pub region: String,
    pub education: EducationLevel,
    pub credit_score: u32,
    pub cards: Vec<BankCard>,
}

impl Person {
    pub fn add_card(&mut self, card: BankCard) {
        self.cards.push(card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_rounds_on_every_mutation() {
        let mut card = BankCard::new("p-000001".into(), "ICBC", CardType::Consumer, 100.0);
        card.credit(0.005);
        assert_eq!(card.balance(), 100.01);
        card.debit(0.004);
        assert_eq!(card.balance(), 100.01);
    }

    #[test]
    fn account_number_carries_type_code() {
        let mut rng = StreamRng::new(11, 0);
        let card =
            BankCard::new("p-000001".into(), "CMB", CardType::Settlement, 0.0).issue_number(&mut rng);
        assert_eq!(card.account_number.len(), 9);
        assert!(card.account_number.starts_with('S'));
        assert!(card.account_number[1..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn tier_parse_fails_fast() {
        let err = "medium".parse::<IncomeTier>().unwrap_err();
        assert!(err.to_string().contains("medium"));
        assert!("middle".parse::<IncomeTier>().is_ok());
    }
}
