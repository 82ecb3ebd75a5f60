//! Deterministic name generation from curated lists.
//!
//! The population and registry need plausible person and company names
//! without reaching for a faker dependency: all draws go through the
//! seeded RNG streams, so the same seed always yields the same names.

use crate::rng::StreamRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn person_name(rng: &mut StreamRng) -> String {
        let first = rng.pick(FIRST_NAMES).expect("first name pool is non-empty");
        let last = rng.pick(LAST_NAMES).expect("last name pool is non-empty");
        format!("{first} {last}")
    }

    /// Company name: "Prefix Line Suffix" or "Surname Line Suffix".
    pub fn company_name(rng: &mut StreamRng) -> String {
        let line = rng.pick(BUSINESS_LINES).expect("line pool is non-empty");
        let suffix = rng.pick(COMPANY_SUFFIXES).expect("suffix pool is non-empty");
        if rng.chance(0.5) {
            let prefix = rng.pick(COMPANY_PREFIXES).expect("prefix pool is non-empty");
            format!("{prefix} {line} {suffix}")
        } else {
            let surname = rng.pick(LAST_NAMES).expect("last name pool is non-empty");
            format!("{surname} {line} {suffix}")
        }
    }

    pub fn business_line(rng: &mut StreamRng) -> &'static str {
        rng.pick(BUSINESS_LINES).expect("line pool is non-empty")
    }

    pub fn region(rng: &mut StreamRng) -> &'static str {
        rng.pick(REGIONS).expect("region pool is non-empty")
    }

    pub fn bank(rng: &mut StreamRng) -> &'static str {
        rng.pick(BANKS).expect("bank pool is non-empty")
    }
}

const FIRST_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
    "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Andrew", "Joshua", "Kevin",
    "Brian", "George", "Edward", "Jason", "Ryan", "Jacob", "Nicholas", "Eric", "Jonathan",
    "Stephen", "Justin", "Scott", "Brandon", "Benjamin", "Samuel", "Gregory", "Patrick",
    "Alexander", "Jack", "Dennis", "Tyler", "Aaron", "Henry", "Peter", "Nathan", "Walter",
    "Mary", "Patricia", "Jennifer", "Linda", "Barbara", "Elizabeth", "Susan", "Jessica",
    "Sarah", "Karen", "Lisa", "Nancy", "Margaret", "Sandra", "Ashley", "Kimberly", "Emily",
    "Donna", "Michelle", "Carol", "Amanda", "Melissa", "Deborah", "Stephanie", "Rebecca",
    "Laura", "Helen", "Samantha", "Katherine", "Christine", "Rachel", "Catherine", "Maria",
    "Heather", "Diane", "Julie", "Olivia", "Victoria", "Kelly", "Lauren", "Christina",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore",
    "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez", "Clark",
    "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright", "Scott", "Torres",
    "Nguyen", "Hill", "Green", "Adams", "Nelson", "Baker", "Hall", "Rivera", "Campbell",
    "Mitchell", "Carter", "Roberts", "Phillips", "Evans", "Turner", "Parker", "Collins",
    "Stewart", "Morris", "Murphy", "Cook", "Rogers", "Morgan", "Cooper", "Peterson", "Bailey",
    "Reed", "Kelly", "Howard", "Kim", "Cox", "Ward", "Richardson", "Watson", "Brooks",
    "Chen", "Patel", "Tran", "Silva", "Ross", "Foster", "Powell", "Russell", "Sullivan",
];

const COMPANY_PREFIXES: &[&str] = &[
    "Premier", "Pacific", "Golden", "Eastern", "Summit", "Harbor", "Unity", "Pioneer",
    "Horizon", "Crescent", "Sterling", "Evergreen", "Landmark", "Cornerstone", "Meridian",
];

const COMPANY_SUFFIXES: &[&str] = &[
    "Ltd", "Co", "Group", "Holdings", "Partners", "Enterprises", "International",
];

/// Business lines. Several entries overlap the rule bank's
/// sensitive-keyword set so generated registries contain screenable
/// positives.
const BUSINESS_LINES: &[&str] = &[
    "investment consulting",
    "wealth management",
    "asset management",
    "fund management",
    "equity investment",
    "financial services",
    "financial information",
    "network technology",
    "e-commerce",
    "biotech research",
    "pension services",
    "guarantee services",
    "manufacturing",
    "logistics",
    "retail trade",
    "construction",
    "food processing",
    "textile trade",
    "machinery leasing",
    "real estate brokerage",
];

/// Registration regions, compared verbatim by the location-mismatch rule.
const REGIONS: &[&str] = &[
    "Guangdong", "Jiangsu", "Zhejiang", "Shandong", "Henan", "Sichuan", "Hubei", "Fujian",
    "Hunan", "Anhui", "Shanghai", "Beijing", "Liaoning", "Shaanxi", "Chongqing", "Yunnan",
];

const BANKS: &[&str] = &["ICBC", "ABC", "CMB", "BOC", "SPDB", "CMBC"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng_a = StreamRng::new(12345, 0);
        let mut rng_b = StreamRng::new(12345, 0);
        assert_eq!(
            NameGenerator::person_name(&mut rng_a),
            NameGenerator::person_name(&mut rng_b)
        );
        assert_eq!(
            NameGenerator::company_name(&mut rng_a),
            NameGenerator::company_name(&mut rng_b)
        );
    }

    #[test]
    fn person_names_have_two_parts() {
        let mut rng = StreamRng::new(99, 0);
        for _ in 0..100 {
            let name = NameGenerator::person_name(&mut rng);
            assert_eq!(name.split_whitespace().count(), 2, "bad name: {name}");
        }
    }

    #[test]
    fn some_business_lines_are_sensitive() {
        // The screening checks depend on the line pool containing
        // keyword matches.
        assert!(BUSINESS_LINES.iter().any(|l| l.contains("investment")));
        assert!(BUSINESS_LINES.iter().any(|l| l.contains("guarantee")));
    }
}
