//! Error types for the volatility index engine

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VixError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Insufficient expiries: {0}")]
    InsufficientExpiries(String),

    #[error("No strike with both call and put midpoints for expiry {expiry}")]
    NoOverlappingStrikes { expiry: NaiveDate },

    #[error("No strike below forward level {forward:.4} for expiry {expiry}")]
    NoStrikeBelowForward { expiry: NaiveDate, forward: f64 },

    #[error("Insufficient strikes for expiry {expiry}: ladder has {count} rows")]
    InsufficientStrikes { expiry: NaiveDate, count: usize },

    #[error("Expiry {expiry} already settled ({minutes:.1} minutes to settlement)")]
    ExpiredTenor { expiry: NaiveDate, minutes: f64 },

    #[error("Near and next term settle at the same minute")]
    DegenerateTenors,

    #[error("Negative 30-day variance: {0}")]
    NegativeVariance(f64),

    #[error("Every constituent of composite '{label}' failed")]
    AllTickersFailed {
        label: String,
        failures: Vec<TickerFailure>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type VixResult<T> = Result<T, VixError>;

impl VixError {
    pub fn data(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn insufficient_expiries(msg: impl Into<String>) -> Self {
        Self::InsufficientExpiries(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// A ticker that dropped out of a composite, with its cause
#[derive(Debug)]
pub struct TickerFailure {
    pub ticker: String,
    pub error: VixError,
}

impl std::fmt::Display for TickerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.ticker, self.error)
    }
}
