use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid income tier '{0}': expected one of 'low', 'middle', 'high'")]
    InvalidIncomeTier(String),

    #[error("Invalid education level '{0}': expected one of 'high_school', 'associate', 'bachelor', 'master', 'doctorate'")]
    InvalidEducation(String),

    #[error("Empty date window: start {start} is not before end {end}")]
    EmptyWindow { start: String, end: String },

    #[error("Timestamp range exhausted: window spent at {last}")]
    RangeExhausted { last: String },

    #[error("Interval spread constraint unsatisfiable: spread limit {limit} days not met after {attempts} attempts")]
    IntervalConstraint { limit: i64, attempts: u32 },

    #[error("Unknown company '{0}' in registry")]
    UnknownCompany(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
