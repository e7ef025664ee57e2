//! Draft to final versioning of measures.

use crate::error::{MeasureError, MeasureResult};
use octomeasure_core::{LifecycleState, Measure, VersionIncrement};
use octomeasure_storage::DynRepository;

pub struct VersionService {
    repository: DynRepository,
}

impl VersionService {
    pub fn new(repository: DynRepository) -> Self {
        Self { repository }
    }

    /// Finalizes a draft measure under its next version.
    ///
    /// Guards run in a fixed order and the first failure is returned:
    /// measure exists, increment is MAJOR/MINOR/PATCH, actor owns the
    /// measure, measure is a draft, CQL compiled without errors, every test
    /// case is valid.
    pub async fn create_version(
        &self,
        measure_id: &str,
        increment: &str,
        acting_user: &str,
    ) -> MeasureResult<Measure> {
        let mut measure = self
            .repository
            .load_measure(measure_id)
            .await?
            .ok_or_else(|| MeasureError::measure_not_found(measure_id))?;

        let increment: VersionIncrement = increment
            .parse()
            .map_err(|e: octomeasure_core::CoreError| MeasureError::invalid_request(e.to_string()))?;

        Self::check_guards(&measure, acting_user).inspect_err(|e| {
            tracing::warn!(
                measure_id,
                user = acting_user,
                category = %e.category(),
                error = %e,
                "Version request rejected"
            );
        })?;

        let previous = measure.version;
        measure.version = previous.increment(increment).ok_or_else(|| {
            MeasureError::conflict(
                measure_id,
                format!("version {previous} cannot take a {increment} increment"),
            )
        })?;
        measure.draft = false;
        measure.touch(acting_user);
        let saved = crate::groups::save(self.repository.as_ref(), &measure).await?;

        tracing::info!(
            measure_id,
            increment = %increment,
            from = %previous,
            version = %saved.version,
            "Measure versioned"
        );
        Ok(saved)
    }

    fn check_guards(measure: &Measure, acting_user: &str) -> MeasureResult<()> {
        if !measure.is_owned_by(acting_user) {
            return Err(MeasureError::unauthorized(acting_user, &measure.id));
        }
        if measure.lifecycle_state() != LifecycleState::Draft {
            return Err(MeasureError::conflict(
                &measure.id,
                format!("version {} is not a draft", measure.version),
            ));
        }
        if measure.cql_errors {
            return Err(MeasureError::conflict(&measure.id, "measure CQL has errors"));
        }
        if let Some(test_case) = measure.test_cases.iter().find(|tc| !tc.valid_resource) {
            return Err(MeasureError::conflict(
                &measure.id,
                format!("test case {} is not valid", test_case.id),
            ));
        }
        Ok(())
    }
}
