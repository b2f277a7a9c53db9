//! Market data providers
//!
//! Handles:
//! - Provider traits consumed by the engine
//! - Yahoo Finance for expiries, option chains and spot
//! - FRED for constant-maturity treasury yields
//! - Recorded snapshots for offline runs

pub mod fred;
pub mod provider;
pub mod snapshot;
pub mod yahoo;

pub use fred::*;
pub use provider::*;
pub use snapshot::*;
pub use yahoo::*;
