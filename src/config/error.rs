//! Configuration error types.

use ledger_markup::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid [schema] section")]
    Schema(#[from] SchemaError),

    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("ledgerbot.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("ledgerbot.toml"));

        let validation_err = ConfigError::Validation("[event.ledger_prefix] is empty".to_string());
        assert!(format!("{validation_err}").contains("ledger_prefix"));
    }

    #[test]
    fn test_schema_error_keeps_source() {
        use std::error::Error as _;

        let err = ConfigError::from(SchemaError::Empty("table_open"));
        assert!(format!("{err}").contains("[schema]"));
        assert!(err.source().is_some());
    }
}
