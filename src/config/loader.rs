//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax-year
//! rule sets from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{JurisdictionConfig, JurisdictionMetadata, TaxYearRules};

/// Loads and provides access to tax-year rule sets.
///
/// The `ConfigLoader` reads YAML configuration files from a jurisdiction
/// directory and selects the rule set in force on a given pay date.
///
/// # Directory Structure
///
/// ```text
/// config/us-ny/
/// ├── jurisdiction.yaml    # Jurisdiction metadata
/// └── tax_years/
///     ├── 2024.yaml        # Rules effective from 2024-01-01
///     └── 2025.yaml        # Rules effective from 2025-01-01
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/us-ny")?;
/// let rules = loader.rules_for(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())?;
/// println!("Social Security wage base: ${}", rules.fica.social_security_wage_base);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: JurisdictionConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, any file contains
    /// invalid YAML or an invalid bracket schedule, or a rule set fails
    /// [`TaxYearRules::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let tax_years = Self::load_tax_years(&path.join("tax_years"))?;

        debug!(
            jurisdiction = %metadata.code,
            tax_years = tax_years.len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            config: JurisdictionConfig::new(metadata, tax_years),
        })
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

    /// Loads every rule set from the tax_years directory.
    fn load_tax_years(dir: &Path) -> EngineResult<Vec<TaxYearRules>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut tax_years = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let rules = Self::load_yaml::<TaxYearRules>(&path)?;
                rules.validate()?;
                debug!(
                    tax_year = rules.tax_year,
                    effective_date = %rules.effective_date,
                    "Loaded tax-year rules"
                );
                tax_years.push(rules);
            }
        }

        if tax_years.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax-year files found)", dir_str),
            });
        }

        Ok(tax_years)
    }

    /// Returns the underlying jurisdiction configuration.
    pub fn config(&self) -> &JurisdictionConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }

    /// Gets the rule set in force on a pay date.
    ///
    /// Finds the most recent rule set whose effective date is on or before `date`.
    pub fn rules_for(&self, date: NaiveDate) -> EngineResult<&TaxYearRules> {
        self.config
            .tax_years()
            .iter()
            .rev()
            .find(|rules| rules.effective_date <= date)
            .ok_or(EngineError::TaxYearNotFound { date })
    }

    /// Gets the rule set for a tax year.
    pub fn rules_for_year(&self, tax_year: i32) -> Option<&TaxYearRules> {
        self.config
            .tax_years()
            .iter()
            .find(|rules| rules.tax_year == tax_year)
    }
}
