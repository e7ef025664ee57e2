//! Version lifecycle against the in-memory repository.

use std::sync::Arc;

use octomeasure_core::{Measure, TestCase, Version};
use octomeasure_db_memory::InMemoryMeasureRepository;
use octomeasure_engine::{ErrorCategory, MeasureError, VersionService};

fn draft(version: Version) -> Measure {
    let mut measure = Measure::new("m1", "QI-Core v4.1.1", "alice");
    measure.version = version;
    measure.test_cases = vec![TestCase::new("tc1", "valid")];
    measure
}

fn setup(measure: Measure) -> (Arc<InMemoryMeasureRepository>, VersionService) {
    let repo = Arc::new(InMemoryMeasureRepository::with_measures([measure]));
    let service = VersionService::new(repo.clone());
    (repo, service)
}

#[tokio::test]
async fn increments_from_2_3_1() {
    for (increment, expected) in [
        ("MAJOR", Version::new(3, 0, 0)),
        ("minor", Version::new(2, 4, 0)),
        ("Patch", Version::new(2, 3, 2)),
    ] {
        let (repo, service) = setup(draft(Version::new(2, 3, 1)));
        let versioned = service.create_version("m1", increment, "alice").await.unwrap();

        assert_eq!(versioned.version, expected, "{increment}");
        assert!(versioned.version > Version::new(2, 3, 1));
        assert!(!versioned.draft);
        assert_eq!(versioned.last_modified_by.as_deref(), Some("alice"));
        assert_eq!(repo.get("m1").unwrap(), versioned);
        assert_eq!(repo.save_count(), 1);
    }
}

#[tokio::test]
async fn missing_measure_wins_over_bad_increment() {
    let (_, service) = setup(draft(Version::default()));
    let err = service.create_version("m404", "HUGE", "mallory").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[tokio::test]
async fn bad_increment_wins_over_ownership() {
    let (repo, service) = setup(draft(Version::default()));
    let err = service.create_version("m1", "HUGE", "mallory").await.unwrap_err();
    assert!(matches!(err, MeasureError::InvalidRequest(_)));
    assert_eq!(repo.save_count(), 0);
}

#[tokio::test]
async fn non_owner_on_final_measure_is_unauthorized() {
    let mut measure = draft(Version::new(1, 0, 0));
    measure.draft = false;
    let (repo, service) = setup(measure);

    let err = service.create_version("m1", "MINOR", "bob").await.unwrap_err();
    assert!(matches!(err, MeasureError::Unauthorized { .. }));

    let err = service.create_version("m1", "MINOR", "alice").await.unwrap_err();
    assert!(matches!(err, MeasureError::Conflict { .. }));
    assert_eq!(repo.save_count(), 0);
}

#[tokio::test]
async fn cql_errors_block_versioning() {
    let mut measure = draft(Version::default());
    measure.cql_errors = true;
    measure.test_cases[0].valid_resource = false;
    let (repo, service) = setup(measure);

    let err = service.create_version("m1", "MAJOR", "alice").await.unwrap_err();
    assert!(matches!(err, MeasureError::Conflict { ref reason, .. } if reason.contains("CQL")));
    assert_eq!(repo.save_count(), 0);
}

#[tokio::test]
async fn invalid_test_case_blocks_versioning() {
    let mut measure = draft(Version::default());
    let mut broken = TestCase::new("tc2", "broken");
    broken.valid_resource = false;
    measure.test_cases.push(broken);
    let (repo, service) = setup(measure);

    let err = service.create_version("m1", "MAJOR", "alice").await.unwrap_err();
    assert!(matches!(err, MeasureError::Conflict { ref reason, .. } if reason.contains("tc2")));
    assert_eq!(repo.save_count(), 0);
    assert!(repo.get("m1").unwrap().draft);
}

#[tokio::test]
async fn exhausted_component_is_a_conflict() {
    let (repo, service) = setup(draft("4294967295.0.0".parse().unwrap()));

    let err = service.create_version("m1", "MAJOR", "alice").await.unwrap_err();
    assert!(matches!(err, MeasureError::Conflict { ref reason, .. } if reason.contains("MAJOR")));
    assert_eq!(repo.save_count(), 0);
    assert!(repo.get("m1").unwrap().draft);

    let versioned = service.create_version("m1", "MINOR", "alice").await.unwrap();
    assert_eq!(versioned.version, Version::new(u32::MAX, 1, 0));
}
