//! Group mutations on a measure aggregate.

use crate::access::DynAccessPolicy;
use crate::error::{MeasureError, MeasureResult};
use crate::synchronizer;
use crate::validator::GroupValidator;
use octomeasure_core::{Group, Measure, TestCase, generate_id, is_blank};
use octomeasure_storage::{DynRepository, MeasureRepository};

pub struct GroupService {
    repository: DynRepository,
    validator: GroupValidator,
    access: DynAccessPolicy,
}

impl GroupService {
    pub fn new(repository: DynRepository, validator: GroupValidator, access: DynAccessPolicy) -> Self {
        Self {
            repository,
            validator,
            access,
        }
    }

    async fn load(&self, measure_id: &str) -> MeasureResult<Measure> {
        self.repository
            .load_measure(measure_id)
            .await?
            .ok_or_else(|| MeasureError::measure_not_found(measure_id))
    }

    /// Groups of a measure in their stored order.
    pub async fn list_groups(&self, measure_id: &str) -> MeasureResult<Vec<Group>> {
        Ok(self.load(measure_id).await?.groups)
    }

    /// Validates a group against a stored measure without saving anything.
    pub async fn validate_group(&self, group: Group, measure_id: &str) -> MeasureResult<Group> {
        let measure = self.load(measure_id).await?;
        self.validator.validate(group, &measure)
    }

    /// Inserts or replaces a group and saves the measure.
    ///
    /// A group whose id matches an existing group replaces it in place;
    /// anything else is appended under a freshly assigned id. Replacing a
    /// group with a different scoring resets the test-case expectations
    /// recorded for it.
    pub async fn upsert_group(
        &self,
        group: Group,
        measure_id: &str,
        acting_user: &str,
    ) -> MeasureResult<Group> {
        let mut measure = self.load(measure_id).await?;

        if !self.access.is_owner_or_authorized(acting_user, &measure) {
            tracing::warn!(measure_id, user = acting_user, "Group upsert rejected: not authorized");
            return Err(MeasureError::unauthorized(acting_user, measure_id));
        }

        let mut group = self.validator.validate(group, &measure).inspect_err(|e| {
            tracing::warn!(measure_id, category = %e.category(), error = %e, "Group rejected");
        })?;
        assign_member_ids(&mut group);

        let existing = group.id_str().and_then(|id| measure.group_index(id));
        let scoring_changed = match existing {
            Some(index) => {
                let previous = std::mem::replace(&mut measure.groups[index], group.clone());
                previous.scoring != group.scoring
            }
            None => {
                group.id = Some(unique_group_id(&measure));
                measure.groups.push(group.clone());
                false
            }
        };

        if scoring_changed {
            measure.test_cases = synchronizer::reconcile(Some(&group), &measure.test_cases);
        }

        measure.touch(acting_user);
        save(self.repository.as_ref(), &measure).await?;

        tracing::info!(
            measure_id,
            group_id = group.id.as_deref().unwrap_or_default(),
            replaced = existing.is_some(),
            scoring_changed,
            backend = self.repository.backend_name(),
            "Group saved"
        );
        Ok(group)
    }

    /// Resets the test-case expectations recorded for one group to its
    /// current scoring and population basis.
    ///
    /// Uses the same access policy as upsert. The measure is saved only when
    /// some entry actually changed.
    pub async fn reconcile_group(
        &self,
        measure_id: &str,
        group_id: &str,
        acting_user: &str,
    ) -> MeasureResult<Vec<TestCase>> {
        let mut measure = self.load(measure_id).await?;

        if !self.access.is_owner_or_authorized(acting_user, &measure) {
            tracing::warn!(measure_id, user = acting_user, "Reconcile rejected: not authorized");
            return Err(MeasureError::unauthorized(acting_user, measure_id));
        }

        let group = measure
            .group(group_id)
            .ok_or_else(|| MeasureError::not_found("Group", group_id))?;
        let reconciled = synchronizer::reconcile(Some(group), &measure.test_cases);
        if reconciled == measure.test_cases {
            return Ok(reconciled);
        }

        measure.test_cases = reconciled;
        measure.touch(acting_user);
        let saved = save(self.repository.as_ref(), &measure).await?;

        tracing::info!(measure_id, group_id, "Test-case expectations reset");
        Ok(saved.test_cases)
    }

    /// Removes a group and saves the measure. Only the owner may delete.
    ///
    /// Test-case entries that referenced the group are left in place.
    pub async fn delete_group(
        &self,
        measure_id: &str,
        group_id: &str,
        acting_user: &str,
    ) -> MeasureResult<Measure> {
        if measure_id.trim().is_empty() {
            return Err(MeasureError::invalid_request("measure id is required"));
        }
        if group_id.trim().is_empty() {
            return Err(MeasureError::invalid_request("group id is required"));
        }

        let mut measure = self.load(measure_id).await?;
        let index = measure
            .group_index(group_id)
            .ok_or_else(|| MeasureError::not_found("Group", group_id))?;

        if !measure.is_owned_by(acting_user) {
            tracing::warn!(measure_id, user = acting_user, "Group delete rejected: not the owner");
            return Err(MeasureError::unauthorized(acting_user, measure_id));
        }

        measure.groups.remove(index);
        measure.touch(acting_user);
        let saved = save(self.repository.as_ref(), &measure).await?;

        tracing::info!(measure_id, group_id, remaining = saved.groups.len(), "Group deleted");
        Ok(saved)
    }
}

/// Saves the aggregate, logging backend failures with their category.
pub(crate) async fn save(
    repository: &dyn MeasureRepository,
    measure: &Measure,
) -> MeasureResult<Measure> {
    repository.save_measure(measure).await.map_err(|e| {
        tracing::error!(
            measure_id = %measure.id,
            backend = repository.backend_name(),
            category = %e.category(),
            error = %e,
            "Failed to save measure"
        );
        MeasureError::from(e)
    })
}

fn unique_group_id(measure: &Measure) -> String {
    loop {
        let id = generate_id();
        if measure.group_index(&id).is_none() {
            return id;
        }
    }
}

fn assign_member_ids(group: &mut Group) {
    let ids = group
        .populations
        .iter_mut()
        .map(|p| &mut p.id)
        .chain(group.stratifications.iter_mut().map(|s| &mut s.id))
        .chain(group.measure_observations.iter_mut().map(|o| &mut o.id));
    for id in ids {
        if is_blank(id.as_deref()) {
            *id = Some(generate_id());
        }
    }
}
