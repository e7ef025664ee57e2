//! Group validation against the measure's model family, the population
//! templates and the measure's compiled logic.

use crate::compatibility::is_compatible;
use crate::error::{MeasureError, MeasureResult, ValidationFailure};
use crate::model_capability;
use crate::population_template::PopulationTemplates;
use octomeasure_core::{Group, Measure};
use octomeasure_cql::{DynOracle, ResolvedType};

/// Human-readable reference to a group member in error messages.
pub(crate) fn member_label(kind: &str, id: Option<&str>, index: usize) -> String {
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{kind} {id}"),
        None => format!("{kind} #{}", index + 1),
    }
}

pub struct GroupValidator {
    oracle: DynOracle,
    templates: PopulationTemplates,
}

impl GroupValidator {
    pub fn new(oracle: DynOracle, templates: PopulationTemplates) -> Self {
        Self { oracle, templates }
    }

    /// Validates `group` in the context of `measure` and hands it back
    /// unchanged when every member passes.
    ///
    /// # Errors
    ///
    /// * `UnsupportedModelType` for an unknown model key
    /// * `InvalidRequest` when the compiled logic is missing or unreadable
    /// * `ValidationFailed` for the first failing rule
    pub fn validate(&self, group: Group, measure: &Measure) -> MeasureResult<Group> {
        let scoring = group.scoring.ok_or(ValidationFailure::MissingScoring)?;
        let basis = group
            .population_basis
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or(ValidationFailure::MissingPopulationBasis)?;

        let model_validator = model_capability::resolve(&measure.model)?;
        model_validator.validate_group(&group)?;

        self.templates.check(scoring, &group)?;

        let artifact = measure
            .elm_json
            .as_deref()
            .filter(|elm| !elm.trim().is_empty())
            .ok_or_else(|| {
                MeasureError::invalid_request(format!(
                    "measure {} has no compiled CQL to validate against",
                    measure.id
                ))
            })?;
        self.oracle.check_artifact(artifact)?;

        for (label, identifier) in Self::identifiers(&group) {
            let resolved = self.oracle.resolve(artifact, identifier)?;
            match resolved {
                ResolvedType::Unresolved => {
                    return Err(ValidationFailure::identifier_not_found(label, identifier).into());
                }
                ref named if !is_compatible(basis, named) => {
                    return Err(ValidationFailure::return_type_mismatch(
                        label,
                        identifier,
                        basis,
                        named.to_string(),
                    )
                    .into());
                }
                _ => {}
            }
        }

        Ok(group)
    }

    /// Every non-blank CQL identifier of the group, in member order.
    fn identifiers(group: &Group) -> Vec<(String, &str)> {
        let populations = group
            .populations
            .iter()
            .filter(|p| p.is_defined())
            .map(|p| (format!("population {}", p.name), p.definition.trim()));

        let stratifications = group
            .stratifications
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_defined())
            .map(|(index, s)| {
                (
                    member_label("stratification", s.id.as_deref(), index),
                    s.cql_definition.trim(),
                )
            });

        let observations = group
            .measure_observations
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_defined())
            .map(|(index, o)| {
                (
                    member_label("measure observation", o.id.as_deref(), index),
                    o.definition.trim(),
                )
            });

        populations.chain(stratifications).chain(observations).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octomeasure_core::{
        MeasureObservation, MeasureScoring, Population, PopulationType, Stratification,
    };
    use octomeasure_cql::TypeTableOracle;
    use std::sync::Arc;

    fn validator() -> GroupValidator {
        let oracle = TypeTableOracle::new()
            .with_type("ipp", "Boolean")
            .with_type("denom", "Boolean")
            .with_type("num", "Boolean")
            .with_type("encounters", "Encounter")
            .with_type("los", "Encounter")
            .with_type("age", "Boolean");
        GroupValidator::new(Arc::new(oracle), PopulationTemplates::default())
    }

    fn measure(model: &str) -> Measure {
        let mut measure = Measure::new("m1", model, "alice");
        measure.elm_json = Some("{\"library\":{}}".to_string());
        measure
    }

    fn cohort(definition: &str) -> Group {
        Group::new(MeasureScoring::Cohort, "Boolean")
            .with_population(Population::new(PopulationType::InitialPopulation, definition))
    }

    #[test]
    fn test_valid_group_passes() {
        let group = cohort("ipp").with_stratification(Stratification::new("age"));
        let validated = validator().validate(group.clone(), &measure("QDM v5.6")).unwrap();
        assert_eq!(validated, group);
    }

    #[test]
    fn test_missing_scoring_and_basis() {
        let v = validator();
        let m = measure("QDM v5.6");

        let mut group = cohort("ipp");
        group.scoring = None;
        let err = v.validate(group, &m).unwrap_err();
        assert_eq!(err.validation_failure(), Some(&ValidationFailure::MissingScoring));

        let mut group = cohort("ipp");
        group.population_basis = Some(" ".into());
        let err = v.validate(group, &m).unwrap_err();
        assert_eq!(err.validation_failure(), Some(&ValidationFailure::MissingPopulationBasis));
    }

    #[test]
    fn test_unsupported_model() {
        let err = validator().validate(cohort("ipp"), &measure("QDM v5.5")).unwrap_err();
        assert!(matches!(err, MeasureError::UnsupportedModelType(_)));
    }

    #[test]
    fn test_association_policy_runs_before_lookups() {
        let group = cohort("unknown")
            .with_stratification(Stratification::new("age").with_association("initialPopulation"));
        let err = validator().validate(group, &measure("QDM v5.6")).unwrap_err();
        assert!(matches!(
            err.validation_failure(),
            Some(ValidationFailure::AssociationNotAllowed { .. })
        ));
    }

    #[test]
    fn test_missing_artifact_is_invalid_request() {
        let mut m = measure("QDM v5.6");
        m.elm_json = None;
        let err = validator().validate(cohort("ipp"), &m).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidRequest(_)));

        m.elm_json = Some("   ".into());
        let err = validator().validate(cohort("ipp"), &m).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidRequest(_)));
    }

    #[test]
    fn test_return_type_mismatch() {
        let err = validator()
            .validate(cohort("encounters"), &measure("QDM v5.6"))
            .unwrap_err();
        assert_eq!(
            err.validation_failure(),
            Some(&ValidationFailure::return_type_mismatch(
                "population initialPopulation",
                "encounters",
                "Boolean",
                "Encounter"
            ))
        );
    }

    #[test]
    fn test_unresolved_identifier_is_distinct_failure() {
        let err = validator()
            .validate(cohort("ipp").with_stratification(Stratification::new("nope")), &measure("QDM v5.6"))
            .unwrap_err();
        assert_eq!(
            err.validation_failure(),
            Some(&ValidationFailure::identifier_not_found("stratification #1", "nope"))
        );
    }

    #[test]
    fn test_observation_checked_against_basis() {
        let group = Group::new(MeasureScoring::ContinuousVariable, "Encounter")
            .with_population(Population::new(PopulationType::InitialPopulation, "encounters"))
            .with_population(Population::new(PopulationType::MeasurePopulation, "encounters"))
            .with_observation(MeasureObservation {
                id: Some("obs-1".into()),
                definition: "los".into(),
                ..MeasureObservation::default()
            });
        assert!(validator().validate(group.clone(), &measure("QDM v5.6")).is_ok());

        let bad = group.with_observation(MeasureObservation {
            definition: "ipp".into(),
            ..MeasureObservation::default()
        });
        let err = validator().validate(bad, &measure("QDM v5.6")).unwrap_err();
        assert!(matches!(
            err.validation_failure(),
            Some(ValidationFailure::ReturnTypeMismatch { item, .. }) if item == "measure observation #2"
        ));
    }

    #[test]
    fn test_blank_optional_identifiers_are_skipped() {
        let group = Group::new(MeasureScoring::Proportion, "Boolean")
            .with_population(Population::new(PopulationType::InitialPopulation, "ipp"))
            .with_population(Population::new(PopulationType::Denominator, "denom"))
            .with_population(Population::new(PopulationType::Numerator, "num"))
            .with_population(Population::new(PopulationType::DenominatorExclusion, ""));
        assert!(validator().validate(group, &measure("QDM v5.6")).is_ok());
    }

    #[test]
    fn test_member_label() {
        assert_eq!(member_label("stratification", Some("S1"), 0), "stratification S1");
        assert_eq!(member_label("stratification", Some(" "), 2), "stratification #3");
        assert_eq!(member_label("measure observation", None, 0), "measure observation #1");
    }
}
