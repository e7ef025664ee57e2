//! Authorization collaborator for group edits.

use octomeasure_core::Measure;
use std::sync::Arc;

pub trait AccessPolicy: Send + Sync {
    fn is_owner_or_authorized(&self, user: &str, measure: &Measure) -> bool;
}

pub type DynAccessPolicy = Arc<dyn AccessPolicy>;

/// Owners and users the measure is shared with may edit groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOrSharedPolicy;

impl AccessPolicy for OwnerOrSharedPolicy {
    fn is_owner_or_authorized(&self, user: &str, measure: &Measure) -> bool {
        measure.is_owned_by(user) || measure.is_shared_with(user)
    }
}

/// Only the owner may edit.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOnlyPolicy;

impl AccessPolicy for OwnerOnlyPolicy {
    fn is_owner_or_authorized(&self, user: &str, measure: &Measure) -> bool {
        measure.is_owned_by(user)
    }
}
