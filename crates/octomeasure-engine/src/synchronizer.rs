//! Keeps test-case expectations in step with group scoring.

use octomeasure_core::{Group, TestCase};

/// Returns the test cases with expectations for `group` reset to its
/// current scoring.
///
/// Every group population entry that references the group gets the group's
/// scoring and population basis and loses its expected values, since they
/// were written for a different set of populations. Entries for other
/// groups, including ids that match no group at all, pass through
/// unchanged. Without a group id or scoring there is nothing to reconcile
/// and an equal copy is returned.
pub fn reconcile(group: Option<&Group>, test_cases: &[TestCase]) -> Vec<TestCase> {
    let Some((group_id, scoring, group)) = group.and_then(|g| {
        let id = g.id_str()?;
        let scoring = g.scoring?;
        Some((id, scoring, g))
    }) else {
        return test_cases.to_vec();
    };

    let mut reset = 0usize;
    let reconciled = test_cases
        .iter()
        .map(|test_case| {
            let mut test_case = test_case.clone();
            for entry in test_case
                .group_populations
                .iter_mut()
                .filter(|entry| entry.references(group_id))
            {
                entry.scoring = Some(scoring);
                entry.population_basis = group.population_basis.clone();
                entry.population_values.clear();
                reset += 1;
            }
            test_case
        })
        .collect();

    if reset > 0 {
        tracing::debug!(group_id, scoring = %scoring, reset, "Reset test case expectations");
    }
    reconciled
}

#[cfg(test)]
mod tests {
    use super::*;
    use octomeasure_core::{
        MeasureScoring, PopulationType, TestCaseGroupPopulation, TestCasePopulationValue,
    };

    fn entry(group_id: &str, scoring: MeasureScoring) -> TestCaseGroupPopulation {
        TestCaseGroupPopulation {
            group_id: Some(group_id.to_string()),
            scoring: Some(scoring),
            population_basis: Some("Boolean".to_string()),
            population_values: vec![
                TestCasePopulationValue::new(PopulationType::InitialPopulation, true),
                TestCasePopulationValue::new(PopulationType::Numerator, false),
            ],
        }
    }

    fn test_cases() -> Vec<TestCase> {
        let mut tc1 = TestCase::new("tc1", "first");
        tc1.group_populations = vec![
            entry("G1", MeasureScoring::Cohort),
            entry("G2", MeasureScoring::Proportion),
        ];
        let mut tc2 = TestCase::new("tc2", "second");
        tc2.group_populations = vec![entry("G9", MeasureScoring::Cohort)];
        vec![tc1, tc2]
    }

    #[test]
    fn test_scoring_change_resets_matching_entries() {
        let group = Group::new(MeasureScoring::ContinuousVariable, "Encounter").with_id("G1");
        let input = test_cases();
        let output = reconcile(Some(&group), &input);

        let reset = &output[0].group_populations[0];
        assert_eq!(reset.scoring, Some(MeasureScoring::ContinuousVariable));
        assert_eq!(reset.population_basis.as_deref(), Some("Encounter"));
        assert!(reset.population_values.is_empty());

        assert_eq!(output[0].group_populations[1], input[0].group_populations[1]);
        assert_eq!(output[1], input[1]);
        // input untouched
        assert_eq!(input, test_cases());
    }

    #[test]
    fn test_noop_guards() {
        let input = test_cases();

        assert_eq!(reconcile(None, &input), input);

        let no_id = Group::new(MeasureScoring::Ratio, "Boolean");
        assert_eq!(reconcile(Some(&no_id), &input), input);

        let mut blank = Group::default().with_id("");
        blank.scoring = None;
        assert_eq!(reconcile(Some(&blank), &input), input);

        let mut no_scoring = Group::default().with_id("G1");
        no_scoring.scoring = None;
        assert_eq!(reconcile(Some(&no_scoring), &input), input);
    }

    #[test]
    fn test_unreferenced_group_is_noop() {
        let input = test_cases();
        let group = Group::new(MeasureScoring::Ratio, "Boolean").with_id("G404");
        assert_eq!(reconcile(Some(&group), &input), input);
    }

    #[test]
    fn test_empty_test_cases() {
        let group = Group::new(MeasureScoring::Ratio, "Boolean").with_id("G1");
        assert!(reconcile(Some(&group), &[]).is_empty());
    }
}
