use std::fmt;

use thiserror::Error;

use crate::runner::RunnerError;

/// Which configuration a piece of content was requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    Old,
    New,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("get {snapshot} {resource_type}: {source}")]
    Retrieval {
        snapshot: Snapshot,
        resource_type: String,
        #[source]
        source: RunnerError,
    },

    #[error("emit issue: {0}")]
    Emit(#[source] RunnerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_display() {
        let err = Error::Retrieval {
            snapshot: Snapshot::Old,
            resource_type: "azurerm_resource_group".to_string(),
            source: RunnerError::Host("connection reset".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "get old azurerm_resource_group: host error: connection reset"
        );
    }

    #[test]
    fn test_retrieval_error_new_snapshot() {
        let err = Error::Retrieval {
            snapshot: Snapshot::New,
            resource_type: "azurerm_subnet".to_string(),
            source: RunnerError::Host("timeout".to_string()),
        };
        assert!(err.to_string().starts_with("get new azurerm_subnet"));
    }

    #[test]
    fn test_emit_error_display() {
        let err = Error::Emit(RunnerError::Host("closed".to_string()));
        assert_eq!(err.to_string(), "emit issue: host error: closed");
    }
}
