//! Required and optional population roles per scoring type.

use crate::error::ValidationFailure;
use octomeasure_core::{Group, MeasureScoring, PopulationType};
use serde::{Deserialize, Serialize};

/// Roles a group of one scoring type may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationTemplate {
    /// Must be present with a non-blank definition.
    pub required: Vec<PopulationType>,
    #[serde(default)]
    pub optional: Vec<PopulationType>,
}

impl PopulationTemplate {
    pub fn new(required: &[PopulationType], optional: &[PopulationType]) -> Self {
        Self {
            required: required.to_vec(),
            optional: optional.to_vec(),
        }
    }

    pub fn allows(&self, role: PopulationType) -> bool {
        self.required.contains(&role) || self.optional.contains(&role)
    }
}

/// Template table keyed by scoring type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationTemplates {
    #[serde(default = "default_cohort")]
    pub cohort: PopulationTemplate,
    #[serde(default = "default_proportion")]
    pub proportion: PopulationTemplate,
    #[serde(default = "default_ratio")]
    pub ratio: PopulationTemplate,
    #[serde(default = "default_continuous_variable")]
    pub continuous_variable: PopulationTemplate,
}

impl Default for PopulationTemplates {
    fn default() -> Self {
        Self {
            cohort: default_cohort(),
            proportion: default_proportion(),
            ratio: default_ratio(),
            continuous_variable: default_continuous_variable(),
        }
    }
}

use PopulationType::*;

fn default_cohort() -> PopulationTemplate {
    PopulationTemplate::new(&[InitialPopulation], &[])
}

fn default_proportion() -> PopulationTemplate {
    PopulationTemplate::new(
        &[InitialPopulation, Denominator, Numerator],
        &[DenominatorExclusion, DenominatorException, NumeratorExclusion],
    )
}

fn default_ratio() -> PopulationTemplate {
    PopulationTemplate::new(
        &[InitialPopulation, Denominator, Numerator],
        &[DenominatorExclusion, NumeratorExclusion, MeasureObservation],
    )
}

fn default_continuous_variable() -> PopulationTemplate {
    PopulationTemplate::new(
        &[InitialPopulation, MeasurePopulation],
        &[MeasurePopulationExclusion, MeasureObservation],
    )
}

impl PopulationTemplates {
    pub fn template(&self, scoring: MeasureScoring) -> &PopulationTemplate {
        match scoring {
            MeasureScoring::Cohort => &self.cohort,
            MeasureScoring::Proportion => &self.proportion,
            MeasureScoring::Ratio => &self.ratio,
            MeasureScoring::ContinuousVariable => &self.continuous_variable,
        }
    }

    /// Checks the group's populations against the template for `scoring`.
    ///
    /// Populations with a blank definition count as absent, so a placeholder
    /// row for a disallowed role is tolerated but cannot satisfy a required one.
    pub fn check(&self, scoring: MeasureScoring, group: &Group) -> Result<(), ValidationFailure> {
        let template = self.template(scoring);

        if let Some(population) = group
            .populations
            .iter()
            .find(|p| p.is_defined() && !template.allows(p.name))
        {
            return Err(ValidationFailure::PopulationNotAllowed {
                scoring,
                role: population.name,
            });
        }

        for &role in &template.required {
            let present = group
                .populations
                .iter()
                .any(|p| p.name == role && p.is_defined());
            if !present {
                return Err(ValidationFailure::MissingRequiredPopulation { scoring, role });
            }
        }

        Ok(())
    }

    /// Rejects templates that list a role as both required and optional.
    pub fn validate(&self) -> Result<(), String> {
        for scoring in MeasureScoring::ALL {
            let template = self.template(scoring);
            if template.required.is_empty() {
                return Err(format!("population template for {scoring} has no required roles"));
            }
            if let Some(role) = template.required.iter().find(|r| template.optional.contains(r)) {
                return Err(format!(
                    "population template for {scoring} lists {role} as both required and optional"
                ));
            }
        }
        Ok(())
    }
}
