//! Error taxonomy surfaced by engine operations.

use octomeasure_core::{MeasureScoring, PopulationType};
use octomeasure_cql::CqlError;
use octomeasure_storage::StorageError;
use std::fmt;
use thiserror::Error;

/// Why a group was rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Group scoring is required")]
    MissingScoring,

    #[error("Group population basis is required")]
    MissingPopulationBasis,

    #[error("Measure model {model} does not allow associations on {item}")]
    AssociationNotAllowed { model: String, item: String },

    #[error("Measure model {model} requires an association on {item}")]
    MissingAssociation { model: String, item: String },

    #[error("Association '{association}' on {item} is not a population type")]
    UnknownAssociation { item: String, association: String },

    #[error("Population {role} is not allowed for {scoring} scoring")]
    PopulationNotAllowed {
        scoring: MeasureScoring,
        role: PopulationType,
    },

    #[error("Population {role} is required for {scoring} scoring")]
    MissingRequiredPopulation {
        scoring: MeasureScoring,
        role: PopulationType,
    },

    #[error(
        "Return type mismatch for {item}: '{identifier}' returns {actual}, population basis is {expected}"
    )]
    ReturnTypeMismatch {
        item: String,
        identifier: String,
        expected: String,
        actual: String,
    },

    #[error("CQL definition '{identifier}' used by {item} was not found")]
    IdentifierNotFound { item: String, identifier: String },
}

impl ValidationFailure {
    pub fn association_not_allowed(model: impl Into<String>, item: impl Into<String>) -> Self {
        Self::AssociationNotAllowed {
            model: model.into(),
            item: item.into(),
        }
    }

    pub fn missing_association(model: impl Into<String>, item: impl Into<String>) -> Self {
        Self::MissingAssociation {
            model: model.into(),
            item: item.into(),
        }
    }

    pub fn unknown_association(item: impl Into<String>, association: impl Into<String>) -> Self {
        Self::UnknownAssociation {
            item: item.into(),
            association: association.into(),
        }
    }

    pub fn return_type_mismatch(
        item: impl Into<String>,
        identifier: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ReturnTypeMismatch {
            item: item.into(),
            identifier: identifier.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn identifier_not_found(item: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::IdentifierNotFound {
            item: item.into(),
            identifier: identifier.into(),
        }
    }
}

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: String, id: String },

    #[error("User {user} is not authorized for measure {measure_id}")]
    Unauthorized { user: String, measure_id: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported model type: {0}")]
    UnsupportedModelType(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationFailure),

    #[error("Conflict on measure {measure_id}: {reason}")]
    Conflict { measure_id: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl MeasureError {
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn measure_not_found(id: impl Into<String>) -> Self {
        Self::not_found("Measure", id)
    }

    pub fn unauthorized(user: impl Into<String>, measure_id: impl Into<String>) -> Self {
        Self::Unauthorized {
            user: user.into(),
            measure_id: measure_id.into(),
        }
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn conflict(measure_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            measure_id: measure_id.into(),
            reason: reason.into(),
        }
    }

    /// The validation failure, if this is one.
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::ValidationFailed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Unauthorized { .. } => ErrorCategory::Unauthorized,
            Self::InvalidRequest(_) | Self::UnsupportedModelType(_) => ErrorCategory::InvalidRequest,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Storage(_) => ErrorCategory::Storage,
        }
    }
}

/// Unreadable compiled logic is a problem with the request, not the group.
impl From<CqlError> for MeasureError {
    fn from(err: CqlError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    Unauthorized,
    InvalidRequest,
    Validation,
    Conflict,
    Storage,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::Validation => write!(f, "validation"),
            Self::Conflict => write!(f, "conflict"),
            Self::Storage => write!(f, "storage"),
        }
    }
}

pub type MeasureResult<T> = Result<T, MeasureError>;
