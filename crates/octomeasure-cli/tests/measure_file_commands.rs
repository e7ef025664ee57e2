//! Runs CLI commands against measure files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use assert_json_diff::assert_json_include;
use clap::Parser;
use octomeasure_cli::cli::Cli;
use octomeasure_cli::{AppConfig, CommandContext, MeasureFile, Outcome};
use serde_json::{Value, json};

fn elm() -> String {
    json!({
        "library": {
            "identifier": {"id": "Diabetes", "version": "1.0.000"},
            "statements": {"def": [
                {"name": "Initial Population",
                 "resultTypeName": "{urn:hl7-org:elm-types:r1}Boolean"},
                {"name": "Denominator",
                 "resultTypeName": "{urn:hl7-org:elm-types:r1}Boolean"},
                {"name": "Numerator",
                 "resultTypeName": "{urn:hl7-org:elm-types:r1}Boolean"},
                {"name": "Inpatient Encounters",
                 "resultTypeSpecifier": {"type": "ListTypeSpecifier",
                     "elementType": {"name": "{http://hl7.org/fhir}Encounter"}}}
            ]}
        }
    })
    .to_string()
}

fn write_measure(dir: &Path) -> PathBuf {
    let path = dir.join("measure.json");
    let measure = json!({
        "id": "m1",
        "measureName": "Diabetes Control",
        "model": "QI-Core v4.1.1",
        "version": "1.2.0",
        "createdBy": "alice",
        "elmJson": elm(),
        "groups": [{
            "id": "G1",
            "scoring": "Cohort",
            "populationBasis": "Boolean",
            "populations": [{"id": "p1", "name": "initialPopulation", "definition": "Initial Population"}]
        }],
        "testCases": [{
            "id": "tc1",
            "title": "adult",
            "validResource": true,
            "groupPopulations": [{
                "groupId": "G1",
                "scoring": "Cohort",
                "populationValues": [{"name": "initialPopulation", "expected": true}]
            }]
        }]
    });
    fs::write(&path, serde_json::to_string_pretty(&measure).unwrap()).unwrap();
    path
}

fn write_group(dir: &Path, group: Value) -> PathBuf {
    let path = dir.join("group.json");
    fs::write(&path, group.to_string()).unwrap();
    path
}

async fn run(measure: &Path, args: &[&str]) -> anyhow::Result<(Outcome, bool)> {
    let mut argv = vec!["octomeasure"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let file = MeasureFile::open(measure)?;
    let ctx = CommandContext::new(file, &AppConfig::default(), cli.user.clone());
    let outcome = ctx.execute(&cli.command).await?;
    let written = ctx.file().write_back()?;
    Ok((outcome, written))
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn list_does_not_touch_file() {
    let dir = tempfile::tempdir().unwrap();
    let measure = write_measure(dir.path());
    let before = fs::read_to_string(&measure).unwrap();

    let (outcome, written) = run(&measure, &["group", "list"]).await.unwrap();
    assert!(matches!(outcome, Outcome::Groups(ref groups) if groups.len() == 1));
    assert!(!written);
    assert_eq!(fs::read_to_string(&measure).unwrap(), before);
}

#[tokio::test]
async fn upsert_with_new_scoring_resets_expectations_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let measure = write_measure(dir.path());
    let group = write_group(
        dir.path(),
        json!({
            "id": "G1",
            "scoring": "Proportion",
            "populationBasis": "Boolean",
            "populations": [
                {"name": "INITIAL_POPULATION", "definition": "Initial Population"},
                {"name": "denominator", "definition": "Denominator"},
                {"name": "numerator", "definition": "Numerator"},
                {"name": "denominatorExclusion", "definition": ""}
            ]
        }),
    );
    let group_arg = group.to_str().unwrap();

    let (outcome, written) = run(
        &measure,
        &["group", "upsert", "--file", group_arg, "--user", "alice"],
    )
    .await
    .unwrap();
    assert!(written);
    assert!(matches!(outcome, Outcome::Group(ref g) if g.id.as_deref() == Some("G1")));

    let saved = read_json(&measure);
    assert_json_include!(
        actual: saved.clone(),
        expected: json!({
            "groups": [{"id": "G1", "scoring": "Proportion"}],
            "testCases": [{"groupPopulations": [{
                "groupId": "G1",
                "scoring": "Proportion",
                "populationValues": []
            }]}],
            "lastModifiedBy": "alice"
        })
    );
    assert_eq!(saved["groups"][0]["populations"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn rejected_group_leaves_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let measure = write_measure(dir.path());
    let before = fs::read_to_string(&measure).unwrap();
    let group = write_group(
        dir.path(),
        json!({
            "scoring": "Cohort",
            "populationBasis": "Boolean",
            "populations": [{"name": "initialPopulation", "definition": "Inpatient Encounters"}]
        }),
    );

    let err = run(
        &measure,
        &["group", "upsert", "--file", group.to_str().unwrap(), "--user", "alice"],
    )
    .await
    .unwrap_err();
    assert!(format!("{err:#}").contains("Return type mismatch"));
    assert_eq!(fs::read_to_string(&measure).unwrap(), before);
}

#[tokio::test]
async fn version_finalizes_measure() {
    let dir = tempfile::tempdir().unwrap();
    let measure = write_measure(dir.path());

    let (outcome, written) = run(&measure, &["version", "minor", "--user", "alice"])
        .await
        .unwrap();
    assert!(written);
    assert!(matches!(outcome, Outcome::Measure(ref m) if !m.draft));

    let saved = read_json(&measure);
    assert_eq!(saved["version"], json!("1.3.0"));
    assert_eq!(saved["draft"], json!(false));
}

#[tokio::test]
async fn mutations_require_a_user() {
    let dir = tempfile::tempdir().unwrap();
    let measure = write_measure(dir.path());

    let file = MeasureFile::open(&measure).unwrap();
    let ctx = CommandContext::new(file, &AppConfig::default(), None);
    let cli = Cli::try_parse_from(["octomeasure", "version", "PATCH"]).unwrap();
    let err = ctx.execute(&cli.command).await.unwrap_err();
    assert!(err.to_string().contains("--user"));
}

#[tokio::test]
async fn delete_and_reconcile() {
    let dir = tempfile::tempdir().unwrap();
    let measure = write_measure(dir.path());

    let err = run(&measure, &["reconcile", "G9", "--user", "alice"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Group not found"));

    let (outcome, written) = run(&measure, &["reconcile", "G1", "--user", "alice"])
        .await
        .unwrap();
    assert!(written);
    let Outcome::TestCases(test_cases) = outcome else {
        panic!("expected test cases");
    };
    let entry = &test_cases[0].group_populations[0];
    assert!(entry.population_values.is_empty());
    assert_eq!(entry.population_basis.as_deref(), Some("Boolean"));

    let (_, written) = run(&measure, &["group", "delete", "G1", "--user", "alice"])
        .await
        .unwrap();
    assert!(written);
    let saved = read_json(&measure);
    assert!(saved["groups"].as_array().unwrap().is_empty());
    assert_eq!(saved["testCases"][0]["groupPopulations"][0]["groupId"], json!("G1"));
}

#[tokio::test]
async fn reconcile_by_non_owner_leaves_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let measure = write_measure(dir.path());
    let before = fs::read_to_string(&measure).unwrap();

    let err = run(&measure, &["reconcile", "G1", "--user", "mallory"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not authorized"));
    assert_eq!(fs::read_to_string(&measure).unwrap(), before);
}

#[test]
fn open_rejects_non_measure_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"id\": 12}").unwrap();
    assert!(MeasureFile::open(&path).is_err());
    assert!(MeasureFile::open(&dir.path().join("missing.json")).is_err());
}
