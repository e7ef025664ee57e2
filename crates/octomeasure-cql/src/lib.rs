//! Compiled-logic oracle for OctoMeasure
//!
//! Group validation needs exactly one thing from a measure's compiled CQL:
//! the return type of a named definition. This crate provides:
//! - the [`CompiledLogicOracle`] trait the engine consumes
//! - an ELM JSON backed implementation with a bounded parse cache
//! - a fixed-table oracle for tests and tooling

pub mod config;
pub mod elm;
pub mod error;
pub mod library_cache;
pub mod oracle;

pub use config::CqlConfig;
pub use elm::{ElmDefinition, ElmLibrary};
pub use error::{CqlError, CqlResult};
pub use library_cache::{CacheStats, LibraryCache};
pub use oracle::{CompiledLogicOracle, DynOracle, ElmOracle, ResolvedType, TypeTableOracle};
