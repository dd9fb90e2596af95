//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load tax-year rule sets from YAML
//! files: income tax bracket schedules, standard deductions, wage bases and
//! the state and local rates the engine calculates against.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/us-ny").unwrap();
//! println!("Loaded jurisdiction: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BracketConfig, ByFilingStatus, FicaRules, IncomeTaxRules, JurisdictionConfig,
    JurisdictionMetadata, LocalTaxRules, LocalityRate, PflCapMode, StateInsuranceRules,
    TaxBracket, TaxSchedule, TaxYearRules, UnemploymentRules,
};
