pub mod local;

pub use local::LocalRunner;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::hclext::{BodyContent, BodySchema, Range};
use crate::rules::{Rule, Severity};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("host error: {0}")]
    Host(String),
}

/// Host side of a rule check: serves the old and new configuration and
/// collects the issues rules emit.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Resource blocks of `resource_type` in the configuration before the
    /// change, restricted to what `schema` asks for.
    async fn get_old_resource_content(
        &self,
        resource_type: &str,
        schema: &BodySchema,
    ) -> Result<BodyContent, RunnerError>;

    async fn get_new_resource_content(
        &self,
        resource_type: &str,
        schema: &BodySchema,
    ) -> Result<BodyContent, RunnerError>;

    async fn emit_issue(
        &self,
        rule: &dyn Rule,
        message: String,
        range: Range,
    ) -> Result<(), RunnerError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub range: Range,
    pub link: String,
}

impl Issue {
    pub fn new(rule: &dyn Rule, message: String, range: Range) -> Self {
        Self {
            rule: rule.name().to_string(),
            severity: rule.severity(),
            message,
            range,
            link: rule.link(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::AzurermForceNewRule;

    #[test]
    fn test_parse_error_display() {
        let err = RunnerError::Parse {
            file: "main.tf".to_string(),
            message: "unexpected token".to_string(),
        };
        assert_eq!(err.to_string(), "failed to parse main.tf: unexpected token");
    }

    #[test]
    fn test_host_error_display() {
        let err = RunnerError::Host("connection closed".to_string());
        assert_eq!(err.to_string(), "host error: connection closed");
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such dir");
        let err: RunnerError = io_err.into();
        assert!(matches!(err, RunnerError::Io(_)));
        assert!(err.to_string().contains("no such dir"));
    }

    #[test]
    fn test_issue_carries_rule_metadata() {
        let rule = AzurermForceNewRule::new();
        let issue = Issue::new(&rule, "changed".to_string(), Range::default());
        assert_eq!(issue.rule, "azurerm_force_new");
        assert_eq!(issue.severity, Severity::Error);
        assert!(issue.link.contains("azurerm_force_new"));
    }

    #[test]
    fn test_issue_serialization() {
        let rule = AzurermForceNewRule::new();
        let issue = Issue::new(&rule, "changed".to_string(), Range::default());
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["rule"], "azurerm_force_new");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["range"]["start"]["line"], 0);
    }
}
