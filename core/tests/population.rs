//! Shape and determinism of the synthesized population and registry.

use amlsim_core::entity::IncomeTier;
use amlsim_core::population::{income_range, PopulationGenerator};
use amlsim_core::registry::RegistryGenerator;
use amlsim_core::rng::{RngBank, StreamSlot};
use amlsim_core::types::round_cents;
use std::collections::HashSet;

#[test]
fn persons_are_well_formed() {
    let bank = RngBank::new(2023);
    let mut rng = bank.for_stream(StreamSlot::Population);
    let population = PopulationGenerator::generate(50, &mut rng);
    assert_eq!(population.len(), 50);

    let mut ids = HashSet::new();
    for person in &population {
        assert!(ids.insert(person.person_id.clone()), "duplicate id {}", person.person_id);
        assert!((18..=80).contains(&person.age));
        assert!((300..=850).contains(&person.credit_score));
        assert!(!person.name.is_empty());

        let (lo, hi) = income_range(person.income_tier);
        assert!(
            person.monthly_income >= lo && person.monthly_income <= hi,
            "income {} outside tier range",
            person.monthly_income
        );

        assert!((1..=3).contains(&person.cards.len()));
        for card in &person.cards {
            assert_eq!(card.owner_id, person.person_id);
            assert_eq!(card.account_number.len(), 9);
            assert!(card.account_number.starts_with('C'));
            assert!(card.account_number[1..].chars().all(|c| c.is_ascii_digit()));
            assert_eq!(card.balance(), round_cents(person.monthly_income * 10.0));
        }
    }
}

#[test]
fn population_is_seed_deterministic() {
    let generate = |seed: u64| {
        let bank = RngBank::new(seed);
        let mut rng = bank.for_stream(StreamSlot::Population);
        PopulationGenerator::generate(20, &mut rng)
            .into_iter()
            .map(|p| (p.person_id, p.name, p.age, p.monthly_income))
            .collect::<Vec<_>>()
    };
    assert_eq!(generate(7), generate(7));
    assert_ne!(generate(7), generate(8));
}

#[test]
fn tier_lookup_rejects_unknown_input() {
    assert!("low".parse::<IncomeTier>().is_ok());
    let err = "astronomical".parse::<IncomeTier>().unwrap_err();
    assert!(err.to_string().contains("astronomical"));
}

#[test]
fn registry_profiles_are_complete() {
    let bank = RngBank::new(2023);
    let mut rng = bank.for_stream(StreamSlot::Registry);
    let registry = RegistryGenerator::generate(30, &mut rng);
    assert_eq!(registry.len(), 30);

    for profile in registry.iter() {
        assert!(profile.company_id.starts_with("co-"));
        assert!(!profile.company_name.is_empty());
        assert!(!profile.legal_representative.is_empty());
        assert!(profile.registered_capital >= 1_000_000.0);
        assert_eq!(profile.contact_number.len(), 11);

        // Screening lookups must agree with the stored fields.
        let sensitive = registry.sensitive_industry(&profile.company_id).unwrap();
        if profile.business_scope.contains("investment consulting") {
            assert!(sensitive);
        }
    }
}
