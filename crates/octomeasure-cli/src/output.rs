use anyhow::Result;
use colored::Colorize;
use octomeasure_core::{Group, Measure, TestCase};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;
use crate::commands::Outcome;

pub fn print_outcome(outcome: &Outcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = match outcome {
                Outcome::Groups(groups) => serde_json::to_string_pretty(groups)?,
                Outcome::Group(group) => serde_json::to_string_pretty(group)?,
                Outcome::Measure(measure) => serde_json::to_string_pretty(measure)?,
                Outcome::TestCases(test_cases) => serde_json::to_string_pretty(test_cases)?,
            };
            println!("{json}");
        }
        OutputFormat::Table => println!("{}", render_table(outcome)),
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn render_table(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Groups(groups) => groups_table(groups),
        Outcome::Group(group) => groups_table(std::slice::from_ref(group)),
        Outcome::Measure(measure) => measure_table(measure),
        Outcome::TestCases(test_cases) => test_cases_table(test_cases),
    }
}

fn groups_table(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups.".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Scoring", "Basis", "Populations", "Stratifications"]);
    for group in groups {
        let populations = group
            .populations
            .iter()
            .filter(|p| p.is_defined())
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        builder.push_record([
            group.id.clone().unwrap_or_else(|| "-".into()),
            group.scoring.map_or_else(|| "-".into(), |s| s.to_string()),
            group.population_basis.clone().unwrap_or_else(|| "-".into()),
            populations,
            group.stratifications.len().to_string(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn measure_table(measure: &Measure) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let state = measure.lifecycle_state().to_string();
    let rows = [
        ("ID", measure.id.clone()),
        ("Name", measure.measure_name.clone().unwrap_or_else(|| "-".into())),
        ("Model", measure.model.clone()),
        ("Version", measure.version.to_string()),
        ("State", state),
        ("Owner", measure.created_by.clone()),
        ("Groups", measure.groups.len().to_string()),
        ("Test cases", measure.test_cases.len().to_string()),
        (
            "Last modified by",
            measure.last_modified_by.clone().unwrap_or_else(|| "-".into()),
        ),
    ];
    for (field, value) in rows {
        builder.push_record([field.to_string(), value]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn test_cases_table(test_cases: &[TestCase]) -> String {
    if test_cases.is_empty() {
        return "No test cases.".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Title", "Valid", "Group", "Scoring", "Expected"]);
    for tc in test_cases {
        let title = tc.title.clone().unwrap_or_else(|| "-".into());
        if tc.group_populations.is_empty() {
            builder.push_record([
                tc.id.clone(),
                title.clone(),
                tc.valid_resource.to_string(),
                "-".into(),
                "-".into(),
                "-".into(),
            ]);
        }
        for entry in &tc.group_populations {
            builder.push_record([
                tc.id.clone(),
                title.clone(),
                tc.valid_resource.to_string(),
                entry.group_id.clone().unwrap_or_else(|| "-".into()),
                entry.scoring.map_or_else(|| "-".into(), |s| s.to_string()),
                entry.population_values.len().to_string(),
            ]);
        }
    }
    builder.build().with(Style::rounded()).to_string()
}
