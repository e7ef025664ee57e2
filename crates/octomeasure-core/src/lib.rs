pub mod error;
pub mod group;
pub mod id;
pub mod measure;
pub mod model;
mod serde_util;
pub mod test_case;
pub mod time;
pub mod version;

pub use error::{CoreError, ErrorCategory, Result};
pub use group::{
    AggregateMethod, Group, MeasureObservation, MeasureScoring, Population, PopulationType,
    Stratification,
};
pub use id::{generate_id, is_blank};
pub use measure::{AclRole, AclSpecification, Measure};
pub use model::ModelType;
pub use test_case::{TestCase, TestCaseGroupPopulation, TestCasePopulationValue};
pub use time::{Timestamp, now_utc};
pub use version::{LifecycleState, Version, VersionIncrement};
