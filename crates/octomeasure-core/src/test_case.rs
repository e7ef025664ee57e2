use crate::group::{MeasureScoring, PopulationType};
use crate::serde_util::blank_as_none;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Expected outcome for one population of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCasePopulationValue {
    pub name: PopulationType,
    /// `true`/`false` for boolean bases, a count for resource bases.
    #[serde(default)]
    pub expected: Value,
}

impl TestCasePopulationValue {
    pub fn new(name: PopulationType, expected: impl Into<Value>) -> Self {
        Self {
            name,
            expected: expected.into(),
        }
    }
}

/// Expected populations of a test case for a single group.
///
/// `group_id` is a lookup-only reference; `scoring` is the group's scoring at
/// the time the expectations were written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseGroupPopulation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub scoring: Option<MeasureScoring>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_basis: Option<String>,
    #[serde(default)]
    pub population_values: Vec<TestCasePopulationValue>,
}

impl TestCaseGroupPopulation {
    pub fn references(&self, group_id: &str) -> bool {
        self.group_id.as_deref() == Some(group_id)
    }
}

/// A sample scenario with expected outcomes per group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    /// Opaque resource payload (a serialized bundle).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
    #[serde(default)]
    pub valid_resource: bool,
    #[serde(default)]
    pub group_populations: Vec<TestCaseGroupPopulation>,
}

impl TestCase {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            valid_resource: true,
            ..Self::default()
        }
    }
}
