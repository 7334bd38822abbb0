//! Run configuration model.
//!
//! This module contains [`RunConfiguration`], the caller-supplied parameters
//! for one monthly payroll run, and its validation rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Parameters of a single monthly payroll run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::RunConfiguration;
/// use rust_decimal::Decimal;
///
/// let config = RunConfiguration {
///     month: 12,
///     year: 2025,
///     include_13th_month: true,
///     airtime_data_percentage: Decimal::from(5),
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.reference(), "PAYROLL-2025-12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Whether this run pays the 13th-month bonus.
    #[serde(default)]
    pub include_13th_month: bool,
    /// Airtime/data cash benefit as a percentage of monthly basic, 0 to 100.
    #[serde(default)]
    pub airtime_data_percentage: Decimal,
}

impl RunConfiguration {
    /// Checks the configuration before any computation happens.
    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(EngineError::Validation {
                field: "month".to_string(),
                message: format!("must be between 1 and 12, got {}", self.month),
            });
        }

        if !(1900..=9999).contains(&self.year) {
            return Err(EngineError::Validation {
                field: "year".to_string(),
                message: format!("must be between 1900 and 9999, got {}", self.year),
            });
        }

        if self.airtime_data_percentage < Decimal::ZERO
            || self.airtime_data_percentage > Decimal::ONE_HUNDRED
        {
            return Err(EngineError::Validation {
                field: "airtime_data_percentage".to_string(),
                message: format!(
                    "must be between 0 and 100, got {}",
                    self.airtime_data_percentage
                ),
            });
        }

        Ok(())
    }

    /// The first day of the run's calendar month.
    pub fn period_start(&self) -> EngineResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| EngineError::Validation {
            field: "month".to_string(),
            message: format!("{}-{} is not a calendar month", self.year, self.month),
        })
    }

    /// Journal reference for the run's period, e.g. `PAYROLL-2025-03`.
    pub fn reference(&self) -> String {
        format!("PAYROLL-{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(month: u32, year: i32, airtime: i64) -> RunConfiguration {
        RunConfiguration {
            month,
            year,
            include_13th_month: false,
            airtime_data_percentage: Decimal::from(airtime),
        }
    }

    #[test]
    fn test_valid_configuration() {
        assert!(config(3, 2025, 0).validate().is_ok());
        assert!(config(1, 2025, 100).validate().is_ok());
    }

    #[test]
    fn test_month_out_of_range() {
        for month in [0, 13] {
            match config(month, 2025, 0).validate() {
                Err(EngineError::Validation { field, .. }) => assert_eq!(field, "month"),
                other => panic!("Expected Validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_airtime_percentage_out_of_range() {
        for airtime in [-1, 101] {
            match config(3, 2025, airtime).validate() {
                Err(EngineError::Validation { field, .. }) => {
                    assert_eq!(field, "airtime_data_percentage")
                }
                other => panic!("Expected Validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_year_out_of_range() {
        assert!(config(3, 1850, 0).validate().is_err());
    }

    #[test]
    fn test_period_start_and_reference() {
        let run = config(3, 2025, 0);
        assert_eq!(
            run.period_start().unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(run.reference(), "PAYROLL-2025-03");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{ "month": 7, "year": 2025 }"#;
        let run: RunConfiguration = serde_json::from_str(json).unwrap();
        assert!(!run.include_13th_month);
        assert_eq!(run.airtime_data_percentage, Decimal::ZERO);
    }
}
