//! Configuration loading and management for the Payroll Engine.
//!
//! This module provides functionality to load payroll policy from YAML files,
//! including statutory contribution rates, dated PAYE tax tables, and the
//! ledger accounts payroll journals post to.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ng_paye").unwrap();
//! println!("Loaded policy: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ALLOWANCE_RATE, LedgerAccounts, NHF_RATE, PENSION_RATE, PolicyConfig, PolicyMetadata,
    ReliefConfig, StatutoryRates, TaxBand, TaxTable,
};
