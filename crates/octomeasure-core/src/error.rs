use thiserror::Error;

/// Core error types for measure model parsing
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid measure version: {0}")]
    InvalidVersion(String),

    #[error("Invalid version increment type: {0}")]
    InvalidVersionIncrement(String),

    #[error("Unsupported model type: {0}")]
    UnsupportedModel(String),

    #[error("Unknown measure scoring: {0}")]
    UnknownScoring(String),

    #[error("Unknown population type: {0}")]
    UnknownPopulationType(String),

    #[error("Unknown aggregate method: {0}")]
    UnknownAggregateMethod(String),

    #[error("Invalid timestamp: {0}")]
    InvalidDateTime(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),
}

impl CoreError {
    /// Create a new InvalidVersion error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion(version.into())
    }

    /// Create a new InvalidVersionIncrement error
    pub fn invalid_version_increment(increment: impl Into<String>) -> Self {
        Self::InvalidVersionIncrement(increment.into())
    }

    /// Create a new UnsupportedModel error
    pub fn unsupported_model(model: impl Into<String>) -> Self {
        Self::UnsupportedModel(model.into())
    }

    pub fn unknown_scoring(scoring: impl Into<String>) -> Self {
        Self::UnknownScoring(scoring.into())
    }

    pub fn unknown_population_type(name: impl Into<String>) -> Self {
        Self::UnknownPopulationType(name.into())
    }

    pub fn unknown_aggregate_method(method: impl Into<String>) -> Self {
        Self::UnknownAggregateMethod(method.into())
    }

    pub fn invalid_date_time(datetime: impl Into<String>) -> Self {
        Self::InvalidDateTime(datetime.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidVersion(_) | Self::InvalidVersionIncrement(_) => ErrorCategory::Validation,
            Self::UnsupportedModel(_) => ErrorCategory::Unsupported,
            Self::UnknownScoring(_)
            | Self::UnknownPopulationType(_)
            | Self::UnknownAggregateMethod(_)
            | Self::InvalidDateTime(_) => ErrorCategory::Validation,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::TimeError(_) => ErrorCategory::System,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Unsupported,
    Serialization,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::invalid_version("1.x");
        assert_eq!(err.to_string(), "Invalid measure version: 1.x");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_unsupported_model_error() {
        let err = CoreError::unsupported_model("QI-Core v9");
        assert_eq!(err.to_string(), "Unsupported model type: QI-Core v9");
        assert_eq!(err.category(), ErrorCategory::Unsupported);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let core_err: CoreError = json_err.into();

        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Unsupported.to_string(), "unsupported");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
        assert_eq!(ErrorCategory::System.to_string(), "system");
    }
}
