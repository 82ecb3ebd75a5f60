//! Amount/count containment and determinism of the pattern generators.

use amlsim_core::config::SimConfig;
use amlsim_core::entity::{BankCard, CardType, EducationLevel, IncomeTier, MaritalStatus, Person};
use amlsim_core::patterns::PatternGenerator;
use amlsim_core::record::{RiskTag, TransactionRecord};
use amlsim_core::rng::StreamRng;
use amlsim_core::types::round_cents;

fn wealthy_person(id: &str, balance: f64) -> Person {
    let mut rng = StreamRng::new(77, 3);
    let card = BankCard::new(id.to_string(), "CMB", CardType::Consumer, balance).issue_number(&mut rng);
    Person {
        person_id: id.to_string(),
        name: "Pattern Party".into(),
        gender: "male".into(),
        age: 45,
        occupation: "executive".into(),
        income_tier: IncomeTier::High,
        monthly_income: 40_000.0,
        marital_status: MaritalStatus::Married,
        region: "Shanghai".into(),
        education: EducationLevel::Master,
        credit_score: 800,
        cards: vec![card],
    }
}

fn generator() -> PatternGenerator {
    PatternGenerator::from_config(&SimConfig::default()).unwrap()
}

fn assert_conserved(records: &[TransactionRecord]) {
    for r in records {
        if r.sender_card_balance_old > 0.0 {
            assert!(
                (r.sender_card_balance_new - round_cents(r.sender_card_balance_old - r.amount))
                    .abs()
                    < 1e-9,
                "sender balance not conserved: {r:?}"
            );
            assert!(
                r.amount <= r.sender_card_balance_old,
                "overdraw emitted: {r:?}"
            );
        }
    }
}

#[test]
fn small_amounts_and_counts_in_range() {
    let mut sender = wealthy_person("p-000001", 10_000_000.0);
    let mut receiver = wealthy_person("p-000002", 0.0);
    let mut rng = StreamRng::new(42, 2);

    let batch = generator().small_transfers(&mut sender, &mut receiver, RiskTag::None, None, &mut rng);
    assert!((20..=50).contains(&batch.len()), "count {} out of range", batch.len());
    for r in &batch {
        assert!((100.0..=2_000.0).contains(&r.amount), "amount {} out of band", r.amount);
        assert_eq!(r.amount, round_cents(r.amount));
    }
    assert_conserved(&batch);
}

#[test]
fn medium_amounts_and_counts_in_range() {
    let mut sender = wealthy_person("p-000001", 10_000_000.0);
    let mut receiver = wealthy_person("p-000002", 0.0);
    let mut rng = StreamRng::new(43, 2);

    let batch = generator().medium_transfers(&mut sender, &mut receiver, RiskTag::None, None, &mut rng);
    assert!((5..=15).contains(&batch.len()));
    for r in &batch {
        assert!((2_000.0..=20_000.0).contains(&r.amount));
    }
    assert_conserved(&batch);
}

#[test]
fn large_amounts_and_counts_in_range() {
    let mut sender = wealthy_person("p-000001", 10_000_000.0);
    let mut receiver = wealthy_person("p-000002", 0.0);
    let mut rng = StreamRng::new(44, 2);

    let batch = generator().large_transfers(&mut sender, &mut receiver, RiskTag::None, None, &mut rng);
    assert!((1..=3).contains(&batch.len()));
    for r in &batch {
        assert!((20_000.0..=200_000.0).contains(&r.amount));
    }
    assert_conserved(&batch);
}

#[test]
fn frequent_large_amounts_and_counts_in_range() {
    let mut sender = wealthy_person("p-000001", 1_000_000_000.0);
    let mut receiver = wealthy_person("p-000002", 0.0);
    let mut rng = StreamRng::new(45, 2);

    let batch =
        generator().frequent_large_transfers(&mut sender, &mut receiver, RiskTag::None, None, &mut rng);
    assert!((15..=30).contains(&batch.len()));
    for r in &batch {
        assert!((50_000.0..=500_000.0).contains(&r.amount));
    }
    assert_conserved(&batch);
}

#[test]
fn investment_amounts_are_positive_and_skewed_large() {
    let mut sender = wealthy_person("p-000001", 1_000_000_000_000.0);
    let mut receiver = wealthy_person("p-000002", 0.0);
    let mut rng = StreamRng::new(46, 2);

    let batch =
        generator().investment_transfers(&mut sender, &mut receiver, RiskTag::None, None, &mut rng);
    assert!((1..=8).contains(&batch.len()));
    for r in &batch {
        assert!(r.amount > 0.0);
        assert_eq!(r.amount, round_cents(r.amount));
    }
    assert_conserved(&batch);
}

#[test]
fn explicit_count_overrides_the_range() {
    let mut sender = wealthy_person("p-000001", 10_000_000.0);
    let mut receiver = wealthy_person("p-000002", 0.0);
    let mut rng = StreamRng::new(47, 2);

    let batch =
        generator().small_transfers(&mut sender, &mut receiver, RiskTag::None, Some(7), &mut rng);
    assert_eq!(batch.len(), 7);
}

#[test]
fn caller_risk_tag_is_carried_through() {
    let mut sender = wealthy_person("p-000001", 10_000_000.0);
    let mut receiver = wealthy_person("p-000002", 0.0);
    let mut rng = StreamRng::new(48, 2);

    let batch =
        generator().medium_transfers(&mut sender, &mut receiver, RiskTag::High, Some(3), &mut rng);
    assert!(batch.iter().all(|r| r.risk_level == RiskTag::High));
}

#[test]
fn poor_sender_yields_short_batch_without_error() {
    // Balance covers none of the medium band; every draw is dropped.
    let mut sender = wealthy_person("p-000001", 500.0);
    let mut receiver = wealthy_person("p-000002", 0.0);
    let mut rng = StreamRng::new(49, 2);

    let batch = generator().medium_transfers(&mut sender, &mut receiver, RiskTag::None, None, &mut rng);
    assert!(batch.is_empty());
    assert_eq!(sender.cards[0].balance(), 500.0);
}

#[test]
fn same_seed_reproduces_the_batch() {
    let run = |seed: u64| {
        let mut sender = wealthy_person("p-000001", 10_000_000.0);
        let mut receiver = wealthy_person("p-000002", 0.0);
        let mut rng = StreamRng::new(seed, 2);
        let batch =
            generator().small_transfers(&mut sender, &mut receiver, RiskTag::None, None, &mut rng);
        amlsim_core::export::transactions_to_csv_string(&batch).unwrap()
    };
    assert_eq!(run(1234), run(1234));
    assert_ne!(run(1234), run(1235));
}
