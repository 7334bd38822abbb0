//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML policy files, along with the statutory
//! defaults used when no policy directory is supplied.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default housing/transport allowance as a fraction of monthly basic salary.
pub const ALLOWANCE_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Default employee pension contribution rate (8%).
pub const PENSION_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Default National Housing Fund contribution rate (2.5%).
pub const NHF_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 3);

/// Metadata about the payroll policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Short identifier for the policy (e.g., "NG-PAYE").
    pub code: String,
    /// The human-readable name of the policy.
    pub name: String,
    /// ISO 4217 currency code all amounts are expressed in.
    pub currency: String,
    /// Reference to the governing legislation.
    pub source: String,
}

/// Statutory rates applied to each employee's monthly pay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutoryRates {
    /// Housing/transport allowance as a fraction of monthly basic salary.
    #[serde(default = "default_allowance_rate")]
    pub allowance_rate: Decimal,
    /// Employee pension rate, applied to basic + allowances.
    pub pension_rate: Decimal,
    /// National Housing Fund rate, applied to basic salary.
    pub nhf_rate: Decimal,
}

fn default_allowance_rate() -> Decimal {
    ALLOWANCE_RATE
}

impl Default for StatutoryRates {
    fn default() -> Self {
        Self {
            allowance_rate: ALLOWANCE_RATE,
            pension_rate: PENSION_RATE,
            nhf_rate: NHF_RATE,
        }
    }
}

/// Policy file structure (policy.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyFile {
    /// Policy metadata.
    pub policy: PolicyMetadata,
    /// Statutory rates.
    pub rates: StatutoryRates,
}

/// Consolidated Relief Allowance parameters, all on the annual axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefConfig {
    /// Minimum fixed relief amount.
    pub floor: Decimal,
    /// Fraction of annual gross compared against the floor.
    pub floor_percentage: Decimal,
    /// Fraction of annual gross added on top of the fixed part.
    pub gross_percentage: Decimal,
}

/// A single progressive tax band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    /// Width of the band in annual taxable income; `None` for the open top band.
    #[serde(default)]
    pub width: Option<Decimal>,
    /// Marginal rate applied within the band.
    pub rate: Decimal,
}

/// A tax table effective from a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    /// The date from which this table applies.
    pub effective_date: NaiveDate,
    /// Relief parameters.
    pub relief: ReliefConfig,
    /// Progressive bands, lowest first.
    pub bands: Vec<TaxBand>,
}

impl TaxTable {
    /// Returns the statutory table: CRA of max(200,000, 1% gross) + 20% gross
    /// and six bands from 7% to 24%.
    pub fn standard() -> Self {
        let band = |width: Option<i64>, rate_pct: i64| TaxBand {
            width: width.map(Decimal::from),
            rate: Decimal::new(rate_pct, 2),
        };

        Self {
            effective_date: NaiveDate::from_ymd_opt(2011, 1, 1)
                .expect("2011-01-01 is a valid date"),
            relief: ReliefConfig {
                floor: Decimal::from(200_000),
                floor_percentage: Decimal::new(1, 2),
                gross_percentage: Decimal::new(20, 2),
            },
            bands: vec![
                band(Some(300_000), 7),
                band(Some(300_000), 11),
                band(Some(500_000), 15),
                band(Some(500_000), 19),
                band(Some(1_600_000), 21),
                band(None, 24),
            ],
        }
    }

    /// Checks the structural rules every band table must satisfy.
    ///
    /// Only the last band may be open-ended, widths must be positive, and
    /// all rates must lie in `[0, 1]`.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidConfig { message };

        if self.bands.is_empty() {
            return Err(invalid(format!(
                "tax table {} has no bands",
                self.effective_date
            )));
        }

        let last = self.bands.len() - 1;
        for (index, band) in self.bands.iter().enumerate() {
            match band.width {
                Some(width) if width <= Decimal::ZERO => {
                    return Err(invalid(format!(
                        "tax table {} band {} has non-positive width {}",
                        self.effective_date,
                        index + 1,
                        width
                    )));
                }
                None if index != last => {
                    return Err(invalid(format!(
                        "tax table {} band {} is open-ended but not the last band",
                        self.effective_date,
                        index + 1
                    )));
                }
                _ => {}
            }
            if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
                return Err(invalid(format!(
                    "tax table {} band {} has rate {} outside [0, 1]",
                    self.effective_date,
                    index + 1,
                    band.rate
                )));
            }
        }

        let relief = &self.relief;
        if relief.floor < Decimal::ZERO
            || relief.floor_percentage < Decimal::ZERO
            || relief.gross_percentage < Decimal::ZERO
        {
            return Err(invalid(format!(
                "tax table {} has negative relief parameters",
                self.effective_date
            )));
        }

        Ok(())
    }
}

/// Chart-of-accounts codes used for the payroll journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccounts {
    /// Expense account debited with total gross pay.
    pub salaries_expense: String,
    /// Liability account credited with PAYE withheld.
    pub paye_payable: String,
    /// Liability account credited with pension contributions.
    pub pension_payable: String,
    /// Liability account credited with NHF contributions.
    pub nhf_payable: String,
    /// Liability account credited with net pay owed to employees.
    pub net_salaries_payable: String,
}

impl Default for LedgerAccounts {
    fn default() -> Self {
        Self {
            salaries_expense: "6100".to_string(),
            paye_payable: "2310".to_string(),
            pension_payable: "2320".to_string(),
            nhf_payable: "2330".to_string(),
            net_salaries_payable: "2340".to_string(),
        }
    }
}

/// Ledger accounts file structure (ledger_accounts.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerAccountsFile {
    /// Account codes.
    pub accounts: LedgerAccounts,
}

/// The complete payroll policy loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a policy configuration directory.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Policy metadata.
    metadata: PolicyMetadata,
    /// Statutory contribution rates.
    rates: StatutoryRates,
    /// Tax tables by effective date (sorted oldest first).
    tax_tables: Vec<TaxTable>,
    /// Ledger account codes.
    accounts: LedgerAccounts,
}

impl PolicyConfig {
    /// Creates a new PolicyConfig from its component parts.
    pub fn new(
        metadata: PolicyMetadata,
        rates: StatutoryRates,
        tax_tables: Vec<TaxTable>,
        accounts: LedgerAccounts,
    ) -> Self {
        let mut sorted_tables = tax_tables;
        sorted_tables.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            rates,
            tax_tables: sorted_tables,
            accounts,
        }
    }

    /// Builds the statutory policy in code, matching the shipped YAML.
    pub fn standard() -> Self {
        Self::new(
            PolicyMetadata {
                code: "NG-PAYE".to_string(),
                name: "Nigeria PAYE (Personal Income Tax Act, as amended 2011)".to_string(),
                currency: "NGN".to_string(),
                source: "PITA 2011 Sixth Schedule".to_string(),
            },
            StatutoryRates::default(),
            vec![TaxTable::standard()],
            LedgerAccounts::default(),
        )
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.metadata
    }

    /// Returns the statutory rates.
    pub fn rates(&self) -> &StatutoryRates {
        &self.rates
    }

    /// Returns all tax tables, oldest first.
    pub fn tax_tables(&self) -> &[TaxTable] {
        &self.tax_tables
    }

    /// Returns the ledger account codes.
    pub fn accounts(&self) -> &LedgerAccounts {
        &self.accounts
    }

    /// Finds the most recent tax table effective on or before `date`.
    pub fn tax_table_for(&self, date: NaiveDate) -> EngineResult<&TaxTable> {
        self.tax_tables
            .iter()
            .rev()
            .find(|table| table.effective_date <= date)
            .ok_or(EngineError::TaxTableNotFound { date })
    }
}
