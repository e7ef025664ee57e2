//! In-memory measure repository for OctoMeasure.
//!
//! Provides an implementation of `MeasureRepository` from
//! `octomeasure-storage` backed by a papaya lock-free HashMap. Used by the
//! CLI (which loads a measure file into memory, runs one operation and writes
//! the result back) and by tests.
//!
//! # Example
//!
//! ```ignore
//! use octomeasure_db_memory::InMemoryMeasureRepository;
//! use octomeasure_storage::MeasureRepository;
//!
//! let repo = InMemoryMeasureRepository::new();
//! repo.insert(measure);
//! let loaded = repo.load_measure("m1").await?;
//! ```

pub mod repository;

pub use octomeasure_storage::{MeasureRepository, StorageError};
pub use repository::InMemoryMeasureRepository;

/// Creates a new shareable in-memory repository.
pub fn create_repository() -> octomeasure_storage::DynRepository {
    std::sync::Arc::new(InMemoryMeasureRepository::new())
}
