//! SQLite archive of generated tables.
//!
//! RULE: Only this module talks to the database. Generators hand over
//! finished rows; they never execute SQL directly.

use crate::{
    entity::Person,
    error::SimResult,
    record::{ts_format, TransactionRecord},
    registry::CompanyProfile,
};
use rusqlite::{params, Connection};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS person (
    run_id         TEXT NOT NULL,
    person_id      TEXT NOT NULL,
    name           TEXT NOT NULL,
    gender         TEXT NOT NULL,
    age            INTEGER NOT NULL,
    occupation     TEXT NOT NULL,
    income_tier    TEXT NOT NULL,
    monthly_income REAL NOT NULL,
    marital_status TEXT NOT NULL,
    region         TEXT NOT NULL,
    education      TEXT NOT NULL,
    credit_score   INTEGER NOT NULL,
    card_count     INTEGER NOT NULL,
    PRIMARY KEY (run_id, person_id)
);

CREATE TABLE IF NOT EXISTS company (
    run_id               TEXT NOT NULL,
    company_id           TEXT NOT NULL,
    company_name         TEXT NOT NULL,
    company_kind         TEXT NOT NULL,
    registered_capital   REAL NOT NULL,
    industry             TEXT NOT NULL,
    region               TEXT NOT NULL,
    established          TEXT NOT NULL,
    legal_representative TEXT NOT NULL,
    contact_number       TEXT NOT NULL,
    address              TEXT NOT NULL,
    agent                TEXT NOT NULL,
    business_scope       TEXT NOT NULL,
    registered_platform  TEXT NOT NULL,
    risk_level           TEXT NOT NULL,
    PRIMARY KEY (run_id, company_id)
);

CREATE TABLE IF NOT EXISTS transactions (
    id                        INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id                    TEXT NOT NULL,
    sender_id                 TEXT NOT NULL,
    sender_card_bank          TEXT NOT NULL,
    sender_card_number        TEXT NOT NULL,
    sender_card_balance_old   REAL NOT NULL,
    sender_card_balance_new   REAL NOT NULL,
    receiver_id               TEXT NOT NULL,
    receiver_card_bank        TEXT NOT NULL,
    receiver_card_number      TEXT NOT NULL,
    receiver_card_balance_old REAL NOT NULL,
    receiver_card_balance_new REAL NOT NULL,
    amount                    REAL NOT NULL,
    timestamp                 TEXT NOT NULL,
    transaction_type          TEXT NOT NULL,
    risk_level                TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_txn_run_type
    ON transactions (run_id, transaction_type);
";

pub struct Archive {
    conn: Connection,
}

impl Archive {
    /// Open (or create) the archive database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only applies to real files; ignore failures elsewhere.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply the schema.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn insert_person(&self, run_id: &str, person: &Person) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO person (run_id, person_id, name, gender, age, occupation, income_tier,
                                 monthly_income, marital_status, region, education, credit_score, card_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                run_id,
                person.person_id,
                person.name,
                person.gender,
                person.age as i64,
                person.occupation,
                person.income_tier.as_str(),
                person.monthly_income,
                person.marital_status.as_str(),
                person.region,
                person.education.as_str(),
                person.credit_score as i64,
                person.cards.len() as i64,
            ],
        )?;
        Ok(())
    }

    pub fn insert_company(&self, run_id: &str, profile: &CompanyProfile) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO company (run_id, company_id, company_name, company_kind, registered_capital,
                                  industry, region, established, legal_representative, contact_number,
                                  address, agent, business_scope, registered_platform, risk_level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                run_id,
                profile.company_id,
                profile.company_name,
                profile.company_kind,
                profile.registered_capital,
                profile.industry,
                profile.region,
                profile.established.to_string(),
                profile.legal_representative,
                profile.contact_number,
                profile.address,
                profile.agent,
                profile.business_scope,
                profile.registered_platform,
                profile.risk_level.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn insert_transaction(&self, run_id: &str, record: &TransactionRecord) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO transactions (run_id, sender_id, sender_card_bank, sender_card_number,
                                       sender_card_balance_old, sender_card_balance_new,
                                       receiver_id, receiver_card_bank, receiver_card_number,
                                       receiver_card_balance_old, receiver_card_balance_new,
                                       amount, timestamp, transaction_type, risk_level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                run_id,
                record.sender_id,
                record.sender_card_bank,
                record.sender_card_number,
                record.sender_card_balance_old,
                record.sender_card_balance_new,
                record.receiver_id,
                record.receiver_card_bank,
                record.receiver_card_number,
                record.receiver_card_balance_old,
                record.receiver_card_balance_new,
                record.amount,
                record.timestamp.format(ts_format::FORMAT).to_string(),
                record.transaction_type.as_str(),
                record.risk_level.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn insert_ledger(&self, run_id: &str, ledger: &[TransactionRecord]) -> SimResult<()> {
        for record in ledger {
            self.insert_transaction(run_id, record)?;
        }
        Ok(())
    }

    pub fn person_count(&self, run_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM person WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn transaction_count(&self, run_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_by_type(&self, run_id: &str, transaction_type: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE run_id = ?1 AND transaction_type = ?2",
            params![run_id, transaction_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn total_volume(&self, run_id: &str) -> SimResult<f64> {
        let volume = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM transactions WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(volume)
    }
}
