//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! policy from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    LedgerAccounts, LedgerAccountsFile, PolicyConfig, PolicyFile, PolicyMetadata, StatutoryRates,
    TaxTable,
};

/// Loads and provides access to payroll policy configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query statutory rates, tax tables and ledger
/// account codes.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/ng_paye/
/// ├── policy.yaml            # Policy metadata and statutory rates
/// ├── ledger_accounts.yaml   # Chart-of-accounts codes for payroll postings
/// └── tax_tables/
///     └── 2011-01-01.yaml    # Relief and PAYE bands effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/ng_paye").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let table = loader.tax_table_for(date).unwrap();
/// println!("{} bands in effect", table.bands.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A tax table breaks the band rules checked by [`TaxTable::validate`]
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let accounts = Self::load_yaml::<LedgerAccountsFile>(&path.join("ledger_accounts.yaml"))?;
        let tax_tables = Self::load_tax_tables(&path.join("tax_tables"))?;

        for table in &tax_tables {
            table.validate()?;
        }

        let config = PolicyConfig::new(policy.policy, policy.rates, tax_tables, accounts.accounts);
        tracing::debug!(
            policy = %config.metadata().code,
            tax_tables = config.tax_tables().len(),
            "Loaded payroll policy"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all tax tables from the tax_tables directory.
    fn load_tax_tables(tables_dir: &Path) -> EngineResult<Vec<TaxTable>> {
        let tables_dir_str = tables_dir.display().to_string();

        let entries = fs::read_dir(tables_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tables_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tables_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tables.push(Self::load_yaml::<TaxTable>(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax tables found)", tables_dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the underlying policy configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        self.config.metadata()
    }

    /// Returns the statutory contribution rates.
    pub fn rates(&self) -> &StatutoryRates {
        self.config.rates()
    }

    /// Returns the ledger account codes.
    pub fn accounts(&self) -> &LedgerAccounts {
        self.config.accounts()
    }

    /// Gets the tax table effective on the given date.
    pub fn tax_table_for(&self, date: NaiveDate) -> EngineResult<&TaxTable> {
        self.config.tax_table_for(date)
    }
}
