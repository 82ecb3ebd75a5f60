//! amlsim-runner: headless batch generator.
//!
//! Usage:
//!   amlsim-runner --seed 42 --persons 100 --rounds 1000 --out transactions.csv
//!   amlsim-runner --seed 42 --config run.json --db run.db --suspicious-pairs 5

use amlsim_core::{
    archive::Archive,
    config::SimConfig,
    engine::SimEngine,
    export,
    population::PopulationGenerator,
    registry::RegistryGenerator,
    rng::{RngBank, StreamSlot},
};
use anyhow::Result;
use std::collections::BTreeMap;
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let persons = parse_arg(&args, "--persons", 100usize);
    let companies = parse_arg(&args, "--companies", 20usize);
    let rounds = parse_arg(&args, "--rounds", 1000u32);
    let suspicious_pairs = parse_arg(&args, "--suspicious-pairs", 0usize);
    let structuring_base = parse_arg(&args, "--structuring-base", 10_000.0f64);
    let out = str_arg(&args, "--out").unwrap_or("transactions.csv");
    let persons_out = str_arg(&args, "--persons-out");
    let db = str_arg(&args, "--db");

    let config = match str_arg(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    println!("amlsim-runner");
    println!("  seed:             {seed}");
    println!("  persons:          {persons}");
    println!("  companies:        {companies}");
    println!("  rounds:           {rounds}");
    println!("  suspicious pairs: {suspicious_pairs}");
    println!("  window:           {} .. {}", config.window.start, config.window.end);
    println!("  out:              {out}");
    println!();

    let rng_bank = RngBank::new(seed);
    let mut population_rng = rng_bank.for_stream(StreamSlot::Population);
    let mut population = PopulationGenerator::generate(persons, &mut population_rng);
    let mut registry_rng = rng_bank.for_stream(StreamSlot::Registry);
    let registry = RegistryGenerator::generate(companies, &mut registry_rng);

    let engine = SimEngine::new(config, seed);
    let mut ledger = engine.run(&mut population, rounds)?;
    if suspicious_pairs > 0 {
        let suspicious =
            engine.run_structuring_random(&mut population, suspicious_pairs, structuring_base)?;
        log::info!("structuring: {} records over {suspicious_pairs} pairs", suspicious.len());
        ledger.extend(suspicious);
    }

    export::write_transactions_csv(out, &ledger)?;
    if let Some(path) = persons_out {
        export::write_persons_csv(path, &population)?;
    }

    if let Some(db_path) = db {
        let run_id = format!("run-{seed}");
        let archive = Archive::open(db_path)?;
        archive.migrate()?;
        for person in &population {
            archive.insert_person(&run_id, person)?;
        }
        for company in registry.iter() {
            archive.insert_company(&run_id, company)?;
        }
        archive.insert_ledger(&run_id, &ledger)?;
        println!("archived {} transactions to {db_path} as {run_id}", ledger.len());
    }

    print_summary(&ledger);
    Ok(())
}

fn print_summary(ledger: &[amlsim_core::record::TransactionRecord]) {
    let mut by_type: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
    for record in ledger {
        let entry = by_type.entry(record.transaction_type.as_str()).or_default();
        entry.0 += 1;
        entry.1 += record.amount;
    }
    let volume: f64 = ledger.iter().map(|r| r.amount).sum();
    let first = ledger.iter().map(|r| r.timestamp).min();
    let last = ledger.iter().map(|r| r.timestamp).max();

    println!("=== RUN SUMMARY ===");
    println!("  total records: {}", ledger.len());
    println!("  total volume:  ${volume:.2}");
    if let (Some(first), Some(last)) = (first, last) {
        println!("  span:          {first} .. {last}");
    }
    for (kind, (count, amount)) in by_type {
        println!("  {kind:<24} {count:>6} records  ${amount:>14.2}");
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
