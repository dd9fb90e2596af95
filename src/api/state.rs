//! Application state for the payroll API.
//!
//! Handlers share one [`AppState`], which owns the loaded rule sets and
//! hands out an engine for whichever tax year a pay date falls in.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::calculation::PayrollEngine;
use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// State cloned into every handler. Cloning only bumps the `Arc`.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Wraps loaded rule sets for sharing across handlers.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The loaded rule sets.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Builds an engine for the rule set in force on a pay date.
    pub fn engine_for(&self, pay_date: NaiveDate) -> EngineResult<PayrollEngine> {
        let rules = self.config.rules_for(pay_date)?;
        PayrollEngine::new(rules.clone())
    }
}
