//! Equal-share properties of the multi-party split pattern.

use amlsim_core::config::SimConfig;
use amlsim_core::entity::{BankCard, CardType, EducationLevel, IncomeTier, MaritalStatus, Person};
use amlsim_core::patterns::PatternGenerator;
use amlsim_core::record::RiskTag;
use amlsim_core::rng::StreamRng;
use chrono::Duration;
use std::collections::HashSet;

fn participant(id: &str) -> Person {
    let mut rng = StreamRng::new(13, 4);
    let card = BankCard::new(id.to_string(), "BOC", CardType::Consumer, 100_000.0)
        .issue_number(&mut rng);
    Person {
        person_id: id.to_string(),
        name: "Split Party".into(),
        gender: "female".into(),
        age: 28,
        occupation: "office_worker".into(),
        income_tier: IncomeTier::Middle,
        marital_status: MaritalStatus::Single,
        monthly_income: 9_000.0,
        region: "Beijing".into(),
        education: EducationLevel::Bachelor,
        credit_score: 720,
        cards: vec![card],
    }
}

#[test]
fn one_record_per_non_payer_at_equal_share() {
    let generator = PatternGenerator::from_config(&SimConfig::default()).unwrap();
    let mut rng = StreamRng::new(2024, 2);

    let mut people: Vec<Person> = (0..5).map(|i| participant(&format!("p-{i:06}"))).collect();
    let mut parties: Vec<&mut Person> = people.iter_mut().collect();

    let share = 120.5;
    let batch = generator.aa_payments(&mut parties, share, RiskTag::None, &mut rng);

    // K participants, one payer: exactly K-1 records, each of the
    // caller-supplied share.
    assert_eq!(batch.len(), 4);
    assert!(batch.iter().all(|r| r.amount == share));
    assert!(batch.iter().all(|r| r.transaction_type.as_str() == "aa_payment"));

    // Every record pays the same payer, and the payer never sends.
    let payers: HashSet<&str> = batch.iter().map(|r| r.receiver_id.as_str()).collect();
    assert_eq!(payers.len(), 1);
    let payer = *payers.iter().next().unwrap();
    let senders: HashSet<&str> = batch.iter().map(|r| r.sender_id.as_str()).collect();
    assert_eq!(senders.len(), 4);
    assert!(!senders.contains(payer));

    // Near-simultaneous: jitter keeps the batch within an hour of its base.
    let earliest = batch.iter().map(|r| r.timestamp).min().unwrap();
    let latest = batch.iter().map(|r| r.timestamp).max().unwrap();
    assert!(latest - earliest <= Duration::minutes(60));

    // The payer's card collected every share.
    let payer_person = people.iter().find(|p| p.person_id == payer).unwrap();
    assert_eq!(payer_person.cards[0].balance(), 100_000.0 + 4.0 * share);
}

#[test]
fn broke_participant_shrinks_the_batch() {
    let generator = PatternGenerator::from_config(&SimConfig::default()).unwrap();

    // Find a seed whose payer draw is not the broke participant, then
    // check the broke sender is dropped and the rest settle.
    for seed in 0..20 {
        let mut rng = StreamRng::new(seed, 2);
        let mut people: Vec<Person> = (0..4).map(|i| participant(&format!("p-{i:06}"))).collect();
        // p-000003 can afford nothing (positive but tiny balance).
        people[3].cards[0] = BankCard::new("p-000003".into(), "BOC", CardType::Consumer, 1.0)
            .with_number("C00000033");

        let mut parties: Vec<&mut Person> = people.iter_mut().collect();
        let batch = generator.aa_payments(&mut parties, 500.0, RiskTag::None, &mut rng);

        let payer = batch.first().map(|r| r.receiver_id.clone());
        if payer.as_deref() != Some("p-000003") && !batch.is_empty() {
            assert_eq!(batch.len(), 2, "broke sender must be dropped");
            assert!(batch.iter().all(|r| r.sender_id != "p-000003"));
            return;
        }
    }
    panic!("no seed produced a solvent payer in 20 tries");
}

#[test]
fn fewer_than_two_participants_yields_nothing() {
    let generator = PatternGenerator::from_config(&SimConfig::default()).unwrap();
    let mut rng = StreamRng::new(3, 2);
    let mut solo = participant("p-000000");
    let mut parties: Vec<&mut Person> = vec![&mut solo];
    assert!(generator.aa_payments(&mut parties, 100.0, RiskTag::None, &mut rng).is_empty());
}
