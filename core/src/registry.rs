//! Corporate registry: company profiles plus account-opening screening.
//!
//! The screening checks are registry-level lookups, not transaction
//! rules: they flag clusters of accounts sharing a legal
//! representative, contact number, address, or agent, and companies
//! whose stated business or registration platform matches a sensitive
//! set.

use crate::{
    error::{SimError, SimResult},
    name_generator::NameGenerator,
    record::RiskTag,
    rng::StreamRng,
    types::{round_cents, CompanyId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_id: CompanyId,
    pub company_name: String,
    pub company_kind: String,
    pub registered_capital: f64,
    pub industry: String,
    pub region: String,
    pub established: NaiveDate,
    pub legal_representative: String,
    pub contact_number: String,
    pub address: String,
    pub agent: String,
    pub business_scope: String,
    pub registered_platform: String,
    pub risk_level: RiskTag,
}

/// Cluster-size thresholds for the shared-attribute check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SharedAttributeThresholds {
    pub legal_representative: u32,
    pub contact_number: u32,
    pub address: u32,
    pub agent: u32,
}

impl Default for SharedAttributeThresholds {
    fn default() -> Self {
        Self {
            legal_representative: 3,
            contact_number: 3,
            address: 5,
            agent: 5,
        }
    }
}

const SENSITIVE_INDUSTRY_KEYWORDS: &[&str] = &[
    "real estate",
    "property management",
    "management consulting",
    "investment consulting",
    "farming",
    "plantation",
    "biotech",
    "elder care",
];

const SUSPICIOUS_PLATFORM_KEYWORDS: &[&str] = &["p2p lending", "guarantee", "investment company"];

const COMPANY_KINDS: &[&str] = &[
    "limited_liability",
    "joint_stock",
    "state_owned",
    "foreign_invested",
    "joint_venture",
];

/// All registered companies for a run, keyed by id.
/// BTreeMap keeps iteration order deterministic.
#[derive(Debug, Default, Clone)]
pub struct CompanyRegistry {
    companies: BTreeMap<CompanyId, CompanyProfile>,
}

impl CompanyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, profile: CompanyProfile) {
        self.companies.insert(profile.company_id.clone(), profile);
    }

    pub fn get(&self, company_id: &str) -> SimResult<&CompanyProfile> {
        self.companies
            .get(company_id)
            .ok_or_else(|| SimError::UnknownCompany(company_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompanyProfile> {
        self.companies.values()
    }

    /// True when the company sits inside attribute clusters at least as
    /// large as every threshold: same legal representative, same
    /// contact number, same address, same agent.
    pub fn shared_attribute_anomaly(
        &self,
        company_id: &str,
        thresholds: SharedAttributeThresholds,
    ) -> SimResult<bool> {
        let target = self.get(company_id)?;

        let count_matching = |pred: &dyn Fn(&CompanyProfile) -> bool| {
            self.companies.values().filter(|p| pred(p)).count() as u32
        };

        let same_rep =
            count_matching(&|p| p.legal_representative == target.legal_representative);
        let same_contact = count_matching(&|p| p.contact_number == target.contact_number);
        let same_address = count_matching(&|p| p.address == target.address);
        let same_agent = count_matching(&|p| p.agent == target.agent);

        Ok(same_rep >= thresholds.legal_representative
            && same_contact >= thresholds.contact_number
            && same_address >= thresholds.address
            && same_agent >= thresholds.agent)
    }

    /// True when the stated business scope matches the sensitive-industry set.
    pub fn sensitive_industry(&self, company_id: &str) -> SimResult<bool> {
        let scope = self.get(company_id)?.business_scope.to_lowercase();
        Ok(SENSITIVE_INDUSTRY_KEYWORDS.iter().any(|kw| scope.contains(kw)))
    }

    /// True when the registration platform matches the suspicious set
    /// (P2P lending platforms, guarantee and investment companies).
    pub fn suspicious_registration(&self, company_id: &str) -> SimResult<bool> {
        let platform = self.get(company_id)?.registered_platform.to_lowercase();
        Ok(SUSPICIOUS_PLATFORM_KEYWORDS
            .iter()
            .any(|kw| platform.contains(kw)))
    }
}

pub struct RegistryGenerator;

impl RegistryGenerator {
    pub fn generate(count: usize, rng: &mut StreamRng) -> CompanyRegistry {
        let mut registry = CompanyRegistry::new();
        for i in 0..count {
            registry.insert(Self::generate_one(i, rng));
        }
        registry
    }

    fn generate_one(index: usize, rng: &mut StreamRng) -> CompanyProfile {
        let line = NameGenerator::business_line(rng);
        let year = rng.int_between(1994, 2022);
        let month = rng.int_between(1, 12) as u32;
        let day = rng.int_between(1, 28) as u32;
        let region = NameGenerator::region(rng).to_string();

        // A small share registers through platforms the screening set
        // matches on.
        let registered_platform = if rng.chance(0.10) {
            rng.pick(&["P2P lending platform", "guarantee company", "investment company"])
                .expect("platform pool is non-empty")
                .to_string()
        } else {
            "commercial registry".to_string()
        };

        CompanyProfile {
            company_id: format!("co-{index:06}"),
            company_name: NameGenerator::company_name(rng),
            company_kind: rng
                .pick(COMPANY_KINDS)
                .expect("kind pool is non-empty")
                .to_string(),
            registered_capital: round_cents(rng.uniform(100.0, 10_000.0) * 10_000.0),
            industry: line.to_string(),
            region: region.clone(),
            established: NaiveDate::from_ymd_opt(year as i32, month, day)
                .expect("day capped at 28"),
            legal_representative: NameGenerator::person_name(rng),
            contact_number: format!(
                "1{}{:09}",
                rng.int_between(3, 9),
                rng.next_u64_below(1_000_000_000)
            ),
            address: format!("{region} industrial park {}", rng.int_between(1, 99)),
            agent: NameGenerator::person_name(rng),
            business_scope: line.to_string(),
            registered_platform,
            risk_level: RiskTag::None,
        }
    }
}
