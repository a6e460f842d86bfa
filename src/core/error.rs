//! Error types surfaced by lattice construction and pricing.

use thiserror::Error;

/// Lattice model error.
///
/// Every failure is a configuration or usage defect: the engines are pure
/// functions of their inputs, so nothing here is transient or retryable.
/// Degenerate delta nodes are resolved locally and never reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// Missing or inconsistent model inputs, or an unknown option family.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A model configuration document could not be decoded or encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LatticeError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<serde_json::Error> for LatticeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LatticeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = LatticeError::config("steps must be >= 1");
        assert_eq!(err.to_string(), "configuration error: steps must be >= 1");
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let err: LatticeError = serde_json::from_str::<f64>("not json").unwrap_err().into();
        assert!(matches!(err, LatticeError::Serialization(_)));
    }
}
