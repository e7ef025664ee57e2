//! OctoMeasure consistency engine
//!
//! Keeps a measure's groups, test-case expectations and version in
//! agreement:
//! - [`GroupValidator`] checks a group against the model family, the
//!   population templates and the compiled CQL
//! - [`GroupService`] inserts, replaces and deletes groups, reconciling
//!   test cases when a group's scoring changes
//! - [`VersionService`] moves a draft measure to a final version
//!
//! Every operation loads the aggregate once, validates fully and saves once.

pub mod access;
pub mod compatibility;
pub mod config;
pub mod error;
pub mod groups;
pub mod model_capability;
pub mod population_template;
pub mod synchronizer;
pub mod validator;
pub mod versioning;

use std::sync::Arc;

use octomeasure_cql::DynOracle;
use octomeasure_storage::DynRepository;

pub use access::{AccessPolicy, DynAccessPolicy, OwnerOnlyPolicy, OwnerOrSharedPolicy};
pub use compatibility::is_compatible;
pub use config::EngineConfig;
pub use error::{ErrorCategory, MeasureError, MeasureResult, ValidationFailure};
pub use groups::GroupService;
pub use model_capability::ModelValidator;
pub use population_template::{PopulationTemplate, PopulationTemplates};
pub use synchronizer::reconcile;
pub use validator::GroupValidator;
pub use versioning::VersionService;

/// Group and version services wired to one repository.
pub struct MeasureEngine {
    groups: GroupService,
    versions: VersionService,
}

impl MeasureEngine {
    pub fn new(repository: DynRepository, oracle: DynOracle, config: &EngineConfig) -> Self {
        let access: DynAccessPolicy = if config.allow_shared_edits {
            Arc::new(OwnerOrSharedPolicy)
        } else {
            Arc::new(OwnerOnlyPolicy)
        };
        let validator = GroupValidator::new(oracle, config.population_templates.clone());
        Self {
            groups: GroupService::new(repository.clone(), validator, access),
            versions: VersionService::new(repository),
        }
    }

    pub fn groups(&self) -> &GroupService {
        &self.groups
    }

    pub fn versions(&self) -> &VersionService {
        &self.versions
    }
}
