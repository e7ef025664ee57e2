//! Measure groups and their members.
//!
//! A [`Group`] is one scoring unit of a measure: a scoring methodology, the
//! population basis every criterion is evaluated over, and the populations,
//! stratifications and observations that reference CQL definitions.

use crate::error::{CoreError, Result};
use crate::id::is_blank;
use crate::serde_util::{blank_as_none, normalize_key};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scoring methodology of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureScoring {
    #[serde(rename = "Cohort")]
    Cohort,
    #[serde(rename = "Proportion")]
    Proportion,
    #[serde(rename = "Ratio")]
    Ratio,
    #[serde(rename = "Continuous Variable", alias = "ContinuousVariable")]
    ContinuousVariable,
}

impl MeasureScoring {
    pub const ALL: [MeasureScoring; 4] = [
        Self::Cohort,
        Self::Proportion,
        Self::Ratio,
        Self::ContinuousVariable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cohort => "Cohort",
            Self::Proportion => "Proportion",
            Self::Ratio => "Ratio",
            Self::ContinuousVariable => "Continuous Variable",
        }
    }
}

impl fmt::Display for MeasureScoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasureScoring {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|scoring| normalize_key(scoring.as_str()) == key)
            .ok_or_else(|| CoreError::unknown_scoring(s))
    }
}

/// Population role a criterion plays within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PopulationType {
    #[serde(alias = "INITIAL_POPULATION")]
    InitialPopulation,
    #[serde(alias = "DENOMINATOR")]
    Denominator,
    #[serde(alias = "DENOMINATOR_EXCLUSION")]
    DenominatorExclusion,
    #[serde(alias = "DENOMINATOR_EXCEPTION")]
    DenominatorException,
    #[serde(alias = "NUMERATOR")]
    Numerator,
    #[serde(alias = "NUMERATOR_EXCLUSION")]
    NumeratorExclusion,
    #[serde(alias = "MEASURE_POPULATION")]
    MeasurePopulation,
    #[serde(alias = "MEASURE_POPULATION_EXCLUSION")]
    MeasurePopulationExclusion,
    #[serde(alias = "MEASURE_OBSERVATION")]
    MeasureObservation,
}

impl PopulationType {
    pub const ALL: [PopulationType; 9] = [
        Self::InitialPopulation,
        Self::Denominator,
        Self::DenominatorExclusion,
        Self::DenominatorException,
        Self::Numerator,
        Self::NumeratorExclusion,
        Self::MeasurePopulation,
        Self::MeasurePopulationExclusion,
        Self::MeasureObservation,
    ];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialPopulation => "initialPopulation",
            Self::Denominator => "denominator",
            Self::DenominatorExclusion => "denominatorExclusion",
            Self::DenominatorException => "denominatorException",
            Self::Numerator => "numerator",
            Self::NumeratorExclusion => "numeratorExclusion",
            Self::MeasurePopulation => "measurePopulation",
            Self::MeasurePopulationExclusion => "measurePopulationExclusion",
            Self::MeasureObservation => "measureObservation",
        }
    }
}

impl fmt::Display for PopulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PopulationType {
    type Err = CoreError;

    /// Accepts `initialPopulation`, `INITIAL_POPULATION` and `Initial Population`.
    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|role| normalize_key(role.as_str()) == key)
            .ok_or_else(|| CoreError::unknown_population_type(s))
    }
}

/// Aggregation applied to the values of a measure observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateMethod {
    Sum,
    Average,
    Median,
    Minimum,
    Maximum,
    Count,
    #[serde(rename = "Standard Deviation", alias = "StdDev")]
    StandardDeviation,
}

impl AggregateMethod {
    pub const ALL: [AggregateMethod; 7] = [
        Self::Sum,
        Self::Average,
        Self::Median,
        Self::Minimum,
        Self::Maximum,
        Self::Count,
        Self::StandardDeviation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "Sum",
            Self::Average => "Average",
            Self::Median => "Median",
            Self::Minimum => "Minimum",
            Self::Maximum => "Maximum",
            Self::Count => "Count",
            Self::StandardDeviation => "Standard Deviation",
        }
    }
}

impl fmt::Display for AggregateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_key(s);
        if key == "stddev" {
            return Ok(Self::StandardDeviation);
        }
        Self::ALL
            .into_iter()
            .find(|method| normalize_key(method.as_str()) == key)
            .ok_or_else(|| CoreError::unknown_aggregate_method(s))
    }
}

/// A population criterion: a role bound to a CQL definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Population {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: PopulationType,
    /// CQL definition name; blank for optional populations left unset.
    #[serde(default)]
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Population {
    pub fn new(name: PopulationType, definition: impl Into<String>) -> Self {
        Self {
            id: None,
            name,
            definition: definition.into(),
            association_type: None,
            description: None,
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.definition.trim().is_empty()
    }
}

/// A sub-grouping of a group's population.
///
/// `association` is kept as the raw string so that the model-specific
/// association policy can report unrecognized roles instead of failing
/// deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stratification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cql_definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associations: Vec<String>,
}

impl Stratification {
    pub fn new(cql_definition: impl Into<String>) -> Self {
        Self {
            cql_definition: cql_definition.into(),
            ..Self::default()
        }
    }

    pub fn with_association(mut self, association: impl Into<String>) -> Self {
        self.association = Some(association.into());
        self
    }

    pub fn is_defined(&self) -> bool {
        !self.cql_definition.trim().is_empty()
    }

    /// `true` when neither the single association nor the list carries a value.
    pub fn has_no_association(&self) -> bool {
        is_blank(self.association.as_deref())
            && self.associations.iter().all(|a| a.trim().is_empty())
    }
}

/// A continuous observation over one of the group's populations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// CQL function name.
    #[serde(default)]
    pub definition: String,
    /// Id of the observed population.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_reference: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub aggregate_method: Option<AggregateMethod>,
}

impl MeasureObservation {
    pub fn is_defined(&self) -> bool {
        !self.definition.trim().is_empty()
    }
}

/// A scoring unit of a measure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub scoring: Option<MeasureScoring>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_basis: Option<String>,
    #[serde(default)]
    pub populations: Vec<Population>,
    #[serde(default)]
    pub stratifications: Vec<Stratification>,
    #[serde(default)]
    pub measure_observations: Vec<MeasureObservation>,
    #[serde(default)]
    pub measure_group_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_unit: Option<serde_json::Value>,
}

impl Group {
    pub fn new(scoring: MeasureScoring, population_basis: impl Into<String>) -> Self {
        Self {
            scoring: Some(scoring),
            population_basis: Some(population_basis.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_population(mut self, population: Population) -> Self {
        self.populations.push(population);
        self
    }

    pub fn with_stratification(mut self, stratification: Stratification) -> Self {
        self.stratifications.push(stratification);
        self
    }

    pub fn with_observation(mut self, observation: MeasureObservation) -> Self {
        self.measure_observations.push(observation);
        self
    }

    /// The group id when it is present and non-blank.
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn population(&self, role: PopulationType) -> Option<&Population> {
        self.populations.iter().find(|p| p.name == role)
    }
}
