pub mod azurerm_force_new;

pub use azurerm_force_new::AzurermForceNewRule;

use std::fmt;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Error;
use crate::project;
use crate::runner::Runner;
use crate::schema::{self, Schema};

pub const RULE_SET_NAME: &str = "azurerm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Notice,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Notice => "NOTICE",
        };
        f.write_str(s)
    }
}

#[async_trait]
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;
    fn enabled(&self) -> bool;
    fn severity(&self) -> Severity;
    fn link(&self) -> String;
    /// Inspects the configuration served by `runner` and emits an issue
    /// through it for every problem found.
    async fn check(&self, runner: &dyn Runner) -> Result<(), Error>;
}

pub struct RuleSet {
    pub name: &'static str,
    pub version: &'static str,
    pub rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        Self {
            name: RULE_SET_NAME,
            version: project::VERSION,
            rules: vec![Box::new(AzurermForceNewRule::with_schema(schema))],
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules
            .iter()
            .map(|rule| rule.as_ref())
            .filter(|rule| rule.enabled())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .map(|rule| rule.as_ref())
            .find(|rule| rule.name() == name)
    }

    /// Runs every enabled rule in registration order, stopping at the first
    /// rule that fails.
    pub async fn check(&self, runner: &dyn Runner) -> Result<(), Error> {
        for rule in self.enabled() {
            tracing::debug!(rule = rule.name(), "running rule");
            rule.check(runner).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("RuleSet")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("rules", &names)
            .finish()
    }
}

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::with_schema(schema::load()));

/// The rule set backed by the embedded provider schema.
pub fn builtin() -> &'static RuleSet {
    &BUILTIN
}
