//! # octomeasure-storage
//!
//! Repository abstraction for measure aggregates.
//!
//! The engine never talks to a database directly. It loads one [`Measure`],
//! computes the new aggregate and hands it back through
//! [`MeasureRepository::save_measure`] in a single call. Concurrency control
//! between writers of the same measure belongs to the backend.
//!
//! ## Example
//!
//! ```ignore
//! use octomeasure_storage::{MeasureRepository, StorageError};
//!
//! async fn owner_of(repo: &dyn MeasureRepository, id: &str) -> Result<String, StorageError> {
//!     let measure = repo
//!         .load_measure(id)
//!         .await?
//!         .ok_or_else(|| StorageError::internal(format!("measure {id} is missing")))?;
//!     Ok(measure.created_by)
//! }
//! ```
//!
//! [`Measure`]: octomeasure_core::Measure

mod error;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use traits::MeasureRepository;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared repository trait object.
pub type DynRepository = std::sync::Arc<dyn MeasureRepository>;
