//! Model-family specific group rules.
//!
//! Each supported model family has exactly one validator, selected by table
//! lookup on the measure's model key. Supporting another family means one
//! new variant and one new row.

use crate::error::{MeasureError, MeasureResult, ValidationFailure};
use crate::validator::member_label;
use octomeasure_core::{Group, ModelType, PopulationType, Stratification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelValidator {
    /// Stratifications must reference a population role.
    QiCore,
    /// Stratifications stand alone; associations are rejected.
    Qdm,
}

const MODEL_VALIDATORS: [(ModelType, ModelValidator); 2] = [
    (ModelType::QiCore411, ModelValidator::QiCore),
    (ModelType::Qdm56, ModelValidator::Qdm),
];

/// Validator for a measure's model key.
///
/// # Errors
///
/// `UnsupportedModelType` for any key outside the table.
pub fn resolve(model: &str) -> MeasureResult<ModelValidator> {
    let model_type: ModelType = model
        .parse()
        .map_err(|_| MeasureError::UnsupportedModelType(model.to_string()))?;
    MODEL_VALIDATORS
        .iter()
        .find(|(candidate, _)| *candidate == model_type)
        .map(|(_, validator)| *validator)
        .ok_or_else(|| MeasureError::UnsupportedModelType(model.to_string()))
}

impl ModelValidator {
    pub fn model(&self) -> ModelType {
        match self {
            Self::QiCore => ModelType::QiCore411,
            Self::Qdm => ModelType::Qdm56,
        }
    }

    /// Checks every stratification of the group; the first violation wins.
    pub fn validate_group(&self, group: &Group) -> Result<(), ValidationFailure> {
        group
            .stratifications
            .iter()
            .enumerate()
            .try_for_each(|(index, strat)| {
                let label = member_label("stratification", strat.id.as_deref(), index);
                self.validate_stratification(&label, strat)
            })
    }

    pub fn validate_stratification(
        &self,
        label: &str,
        strat: &Stratification,
    ) -> Result<(), ValidationFailure> {
        let model = self.model().key();
        match self {
            Self::Qdm => {
                if strat.has_no_association() {
                    Ok(())
                } else {
                    Err(ValidationFailure::association_not_allowed(model, label))
                }
            }
            Self::QiCore => {
                let association = strat
                    .association
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| ValidationFailure::missing_association(model, label))?;
                let listed = strat
                    .associations
                    .iter()
                    .map(|a| a.trim())
                    .filter(|a| !a.is_empty());
                for candidate in std::iter::once(association).chain(listed) {
                    candidate
                        .parse::<PopulationType>()
                        .map_err(|_| ValidationFailure::unknown_association(label, candidate))?;
                }
                Ok(())
            }
        }
    }
}
