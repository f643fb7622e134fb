//! tfbreak-ruleset-azurerm
//!
//! Rules that flag Azure RM configuration changes which force Terraform to
//! destroy and recreate a resource.

pub mod error;
pub mod eval;
pub mod finding;
pub mod hclext;
pub mod output;
pub mod project;
pub mod rules;
pub mod runner;
pub mod schema;

pub use error::{Error, Snapshot};
pub use finding::Finding;
pub use rules::{AzurermForceNewRule, Rule, RuleSet, Severity};
pub use runner::{Issue, LocalRunner, Runner, RunnerError};
pub use schema::{Schema, SchemaError};
