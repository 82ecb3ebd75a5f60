//! Delimited export of the generated tables.
//!
//! UTF-8, comma-delimited, one header row; timestamps in
//! `YYYY-MM-DD HH:MM:SS`. The header is written explicitly so an empty
//! run still produces a well-formed file.

use crate::{
    entity::Person,
    error::{SimError, SimResult},
    record::TransactionRecord,
};
use std::io::Write;
use std::path::Path;

pub const TRANSACTION_HEADER: [&str; 14] = [
    "sender_id",
    "sender_card_bank",
    "sender_card_number",
    "sender_card_balance_old",
    "sender_card_balance_new",
    "receiver_id",
    "receiver_card_bank",
    "receiver_card_number",
    "receiver_card_balance_old",
    "receiver_card_balance_new",
    "amount",
    "timestamp",
    "transaction_type",
    "risk_level",
];

pub const PERSON_HEADER: [&str; 12] = [
    "person_id",
    "name",
    "gender",
    "age",
    "occupation",
    "income_tier",
    "monthly_income",
    "marital_status",
    "region",
    "education",
    "credit_score",
    "card_count",
];

fn write_transactions<W: Write>(writer: W, ledger: &[TransactionRecord]) -> SimResult<W> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(TRANSACTION_HEADER)?;
    for record in ledger {
        csv_writer.serialize(record)?;
    }
    csv_writer
        .into_inner()
        .map_err(|e| SimError::Io(e.into_error()))
}

pub fn write_transactions_csv<P: AsRef<Path>>(
    path: P,
    ledger: &[TransactionRecord],
) -> SimResult<()> {
    let file = std::fs::File::create(path)?;
    let mut inner = write_transactions(file, ledger)?;
    inner.flush()?;
    Ok(())
}

/// In-memory variant, used by tests and small tooling.
pub fn transactions_to_csv_string(ledger: &[TransactionRecord]) -> SimResult<String> {
    let bytes = write_transactions(Vec::new(), ledger)?;
    String::from_utf8(bytes)
        .map_err(|e| SimError::Other(anyhow::anyhow!("CSV output was not UTF-8: {e}")))
}

pub fn write_persons_csv<P: AsRef<Path>>(path: P, persons: &[Person]) -> SimResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(PERSON_HEADER)?;
    for person in persons {
        let age = person.age.to_string();
        let monthly_income = format!("{:.2}", person.monthly_income);
        let credit_score = person.credit_score.to_string();
        let card_count = person.cards.len().to_string();
        writer.write_record([
            person.person_id.as_str(),
            person.name.as_str(),
            person.gender.as_str(),
            age.as_str(),
            person.occupation.as_str(),
            person.income_tier.as_str(),
            monthly_income.as_str(),
            person.marital_status.as_str(),
            person.region.as_str(),
            person.education.as_str(),
            credit_score.as_str(),
            card_count.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
