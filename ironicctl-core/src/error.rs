/// Structured error types for ironicctl-core.
///
/// The library returns `IronicError`; the binary wraps it in `anyhow` at the
/// command boundary.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::InvokeError;

/// Main error type for ironicctl-core operations
#[derive(Error, Debug)]
pub enum IronicError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// `keystone_authtoken` is missing or incomplete
    #[error("Ironic types will not work if ironic is not correctly configured: {reason}")]
    Credentials { reason: String },

    /// Malformed line in an INI document
    #[error("Failed to parse {path:?} at line {line}: {reason}")]
    IniParse {
        path: Option<PathBuf>,
        line: usize,
        reason: String,
    },

    /// Catalog parameters are inconsistent or out of range
    #[error("Invalid parameter '{name}': {reason}")]
    Params { name: String, reason: String },

    /// TOML parsing failed
    #[error("TOML error in {context}: {source}")]
    Toml {
        context: String,
        source: toml::de::Error,
    },

    /// The ironic CLI failed with a non-retryable error
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// Transient failures persisted past the retry budget
    #[error("ironic CLI still failing after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: InvokeError },
}

/// Result type alias for ironicctl-core operations
pub type Result<T> = std::result::Result<T, IronicError>;

impl IronicError {
    /// Create a credentials error
    pub fn credentials(reason: impl Into<String>) -> Self {
        Self::Credentials {
            reason: reason.into(),
        }
    }

    /// Create an INI parse error (path filled in by the caller when known)
    pub fn ini_parse(line: usize, reason: impl Into<String>) -> Self {
        Self::IniParse {
            path: None,
            line,
            reason: reason.into(),
        }
    }

    /// Create a parameter validation error
    pub fn params(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Params {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a TOML error with context
    pub fn toml(context: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Toml {
            context: context.into(),
            source,
        }
    }

    /// Attach a file path to an INI parse error
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::IniParse { line, reason, .. } => Self::IniParse {
                path: Some(path.into()),
                line,
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_display() {
        let err = IronicError::credentials("missing section keystone_authtoken");
        let msg = err.to_string();
        assert!(msg.contains("will not work"));
        assert!(msg.contains("keystone_authtoken"));
    }

    #[test]
    fn test_with_path_only_touches_ini_errors() {
        let err = IronicError::ini_parse(3, "missing '='").with_path("/etc/ironic/ironic.conf");
        assert!(err.to_string().contains("/etc/ironic/ironic.conf"));
        assert!(err.to_string().contains("line 3"));

        let err = IronicError::params("x", "y").with_path("/tmp/a");
        assert!(matches!(err, IronicError::Params { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: IronicError = io_err.into();

        assert!(matches!(err, IronicError::Io { .. }));
    }
}
