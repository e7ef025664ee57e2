//! Repository trait for measure aggregates.

use async_trait::async_trait;
use octomeasure_core::Measure;

use crate::error::StorageError;

/// Loads and saves whole measure aggregates.
///
/// Implementations must be thread-safe (`Send + Sync`) and treat each call
/// as atomic: a saved measure replaces the stored one completely.
///
/// # Example
///
/// ```ignore
/// use octomeasure_storage::{MeasureRepository, StorageError};
///
/// async fn finalize(repo: &dyn MeasureRepository, id: &str) -> Result<(), StorageError> {
///     let mut measure = repo
///         .load_measure(id)
///         .await?
///         .ok_or_else(|| StorageError::internal(format!("measure {id} is missing")))?;
///     measure.draft = false;
///     repo.save_measure(&measure).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait MeasureRepository: Send + Sync {
    /// Reads a measure by ID.
    ///
    /// Returns `None` if the measure does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing measures.
    async fn load_measure(&self, id: &str) -> Result<Option<Measure>, StorageError>;

    /// Persists the whole aggregate, returning the stored form.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Internal` when the backend cannot store the
    /// aggregate, or `StorageError::Serialization` when it cannot encode it.
    async fn save_measure(&self, measure: &Measure) -> Result<Measure, StorageError>;

    /// Returns the name of the storage backend (for logging).
    fn backend_name(&self) -> &'static str;
}
