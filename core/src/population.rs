//! Person synthesis.
//!
//! Demographics are drawn from age-banded weighted tables: age picks an
//! occupation pool, occupation (plus age band for freelancers) picks
//! income tier and marital status, tier picks the income range and
//! education distribution. Every table is a pure lookup function with no
//! shared mutable state, and every draw goes through the population
//! RNG stream, so a seed fully determines the population.

use crate::{
    entity::{BankCard, CardType, EducationLevel, IncomeTier, MaritalStatus, Person},
    name_generator::NameGenerator,
    rng::StreamRng,
    types::round_cents,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupation {
    Student,
    EarlyCareer,
    Freelancer,
    OfficeWorker,
    Specialist,
    SmallBusinessOwner,
    SeniorManager,
    SmeOwner,
    Executive,
    Professional,
    Proprietor,
    Retiree,
    Consultant,
    Investor,
    Principal,
}

impl Occupation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::EarlyCareer => "early_career",
            Self::Freelancer => "freelancer",
            Self::OfficeWorker => "office_worker",
            Self::Specialist => "technical_specialist",
            Self::SmallBusinessOwner => "small_business_owner",
            Self::SeniorManager => "senior_manager",
            Self::SmeOwner => "sme_owner",
            Self::Executive => "executive",
            Self::Professional => "professional",
            Self::Proprietor => "proprietor",
            Self::Retiree => "retiree",
            Self::Consultant => "consultant",
            Self::Investor => "investor",
            Self::Principal => "corporate_principal",
        }
    }
}

use Occupation::*;

/// Occupation pool for an age band.
pub fn occupation_table(age: u32) -> &'static [(Occupation, f64)] {
    match age {
        0..=25 => &[(Student, 0.80), (EarlyCareer, 0.15), (Freelancer, 0.05)],
        26..=35 => &[
            (OfficeWorker, 0.40),
            (Specialist, 0.30),
            (Freelancer, 0.20),
            (SmallBusinessOwner, 0.10),
        ],
        36..=45 => &[
            (SeniorManager, 0.30),
            (Specialist, 0.40),
            (Freelancer, 0.20),
            (SmeOwner, 0.10),
        ],
        46..=60 => &[
            (Executive, 0.30),
            (Professional, 0.30),
            (Proprietor, 0.30),
            (Freelancer, 0.10),
        ],
        _ => &[
            (Retiree, 0.50),
            (Consultant, 0.30),
            (Investor, 0.10),
            (Principal, 0.10),
        ],
    }
}

/// Income-tier weights for an occupation. Freelancer earnings climb
/// with the age band, so age participates in the lookup.
pub fn tier_weights(occupation: Occupation, age: u32) -> &'static [(IncomeTier, f64)] {
    use IncomeTier::*;
    match occupation {
        Student | EarlyCareer => &[(Low, 1.0)],
        Freelancer if age <= 25 => &[(Low, 0.70), (Middle, 0.30)],
        Freelancer if age <= 35 => &[(Low, 0.20), (Middle, 0.50), (High, 0.30)],
        Freelancer => &[(Middle, 0.20), (High, 0.80)],
        OfficeWorker => &[(Low, 0.10), (Middle, 0.70), (High, 0.20)],
        Specialist => &[(Low, 0.10), (Middle, 0.60), (High, 0.30)],
        SmallBusinessOwner => &[(Low, 0.10), (Middle, 0.50), (High, 0.40)],
        SeniorManager | SmeOwner => &[(Middle, 0.05), (High, 0.95)],
        Professional => &[(Middle, 0.20), (High, 0.80)],
        Consultant => &[(Middle, 0.50), (High, 0.50)],
        Retiree => &[(Middle, 1.0)],
        Executive | Proprietor | Investor | Principal => &[(High, 1.0)],
    }
}

/// Marital-status weights for an occupation.
pub fn marital_weights(occupation: Occupation, age: u32) -> &'static [(MaritalStatus, f64)] {
    use MaritalStatus::*;
    match occupation {
        Student => &[(Single, 1.0)],
        EarlyCareer => &[(Single, 0.80), (Married, 0.15), (Divorced, 0.05)],
        Freelancer if age <= 25 => &[(Single, 0.80), (Married, 0.15), (Divorced, 0.05)],
        Freelancer if age <= 35 => &[(Single, 0.30), (Married, 0.65), (Divorced, 0.05)],
        Freelancer if age <= 45 => &[(Single, 0.20), (Married, 0.75), (Divorced, 0.05)],
        OfficeWorker => &[(Single, 0.30), (Married, 0.65), (Divorced, 0.05)],
        Specialist | SmallBusinessOwner => &[(Single, 0.20), (Married, 0.75), (Divorced, 0.05)],
        SeniorManager => &[(Single, 0.10), (Married, 0.85), (Divorced, 0.05)],
        _ => &[(Single, 0.05), (Married, 0.85), (Divorced, 0.10)],
    }
}

/// Monthly income support for a tier.
pub fn income_range(tier: IncomeTier) -> (f64, f64) {
    match tier {
        IncomeTier::Low => (2_000.0, 5_000.0),
        IncomeTier::Middle => (5_000.0, 15_000.0),
        IncomeTier::High => (15_000.0, 50_000.0),
    }
}

/// Education distribution for a tier.
pub fn education_weights(tier: IncomeTier) -> &'static [(EducationLevel, f64)] {
    use EducationLevel::*;
    match tier {
        IncomeTier::Low => &[
            (HighSchool, 0.40),
            (Associate, 0.40),
            (Bachelor, 0.15),
            (Master, 0.04),
            (Doctorate, 0.01),
        ],
        IncomeTier::Middle => &[
            (HighSchool, 0.20),
            (Associate, 0.40),
            (Bachelor, 0.30),
            (Master, 0.08),
            (Doctorate, 0.02),
        ],
        IncomeTier::High => &[
            (HighSchool, 0.05),
            (Associate, 0.15),
            (Bachelor, 0.50),
            (Master, 0.20),
            (Doctorate, 0.10),
        ],
    }
}

pub struct PopulationGenerator;

impl PopulationGenerator {
    /// Generate `count` persons, each holding 1–3 consumer cards with
    /// an initial balance of 10× monthly income.
    pub fn generate(count: usize, rng: &mut StreamRng) -> Vec<Person> {
        (0..count).map(|i| Self::generate_one(i, rng)).collect()
    }

    fn generate_one(index: usize, rng: &mut StreamRng) -> Person {
        let age = rng.int_between(18, 80) as u32;
        let occupation = *rng.weighted_pick(occupation_table(age));
        let income_tier = *rng.weighted_pick(tier_weights(occupation, age));
        let marital_status = *rng.weighted_pick(marital_weights(occupation, age));
        let (income_lo, income_hi) = income_range(income_tier);
        let monthly_income = round_cents(rng.uniform(income_lo, income_hi));
        let education = *rng.weighted_pick(education_weights(income_tier));

        let mut person = Person {
            person_id: format!("p-{index:06}"),
            name: NameGenerator::person_name(rng),
            gender: if rng.chance(0.5) { "male" } else { "female" }.to_string(),
            age,
            occupation: occupation.label().to_string(),
            income_tier,
            monthly_income,
            marital_status,
            region: NameGenerator::region(rng).to_string(),
            education,
            credit_score: rng.int_between(300, 850) as u32,
            cards: Vec::new(),
        };

        let num_cards = rng.int_between(1, 3);
        for _ in 0..num_cards {
            let card = BankCard::new(
                person.person_id.clone(),
                NameGenerator::bank(rng),
                CardType::Consumer,
                monthly_income * 10.0,
            )
            .issue_number(rng);
            person.add_card(card);
        }
        person
    }
}
