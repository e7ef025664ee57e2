//! Return-type oracle over compiled measure logic

use crate::config::CqlConfig;
use crate::elm::ElmLibrary;
use crate::error::{CqlError, CqlResult};
use crate::library_cache::{CacheStats, LibraryCache};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type returned by a compiled definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    /// Definition exists; payload is its type name without namespace.
    Named(String),
    /// No definition with that name exists in the artifact.
    Unresolved,
}

impl ResolvedType {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Unresolved => None,
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.name()
            .is_some_and(|name| name.trim().eq_ignore_ascii_case("boolean"))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Unresolved => f.write_str("<unresolved>"),
        }
    }
}

/// Answers "what does this identifier return" for a compiled artifact.
pub trait CompiledLogicOracle: Send + Sync {
    /// Fails when the artifact is missing or cannot be read at all.
    fn check_artifact(&self, artifact: &str) -> CqlResult<()>;

    /// Resolves the type an identifier contributes to a population.
    fn resolve(&self, artifact: &str, identifier: &str) -> CqlResult<ResolvedType>;

    fn name(&self) -> &'static str;
}

pub type DynOracle = Arc<dyn CompiledLogicOracle>;

/// Oracle reading ELM JSON artifacts.
///
/// Definitions without any type annotation resolve to `Any`.
pub struct ElmOracle {
    cache: Option<LibraryCache>,
}

impl ElmOracle {
    pub fn new(config: &CqlConfig) -> Self {
        let cache = config
            .cache_enabled
            .then(|| LibraryCache::new(config.cache_capacity));
        Self { cache }
    }

    /// Oracle that parses the artifact on every call.
    pub fn uncached() -> Self {
        Self { cache: None }
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(LibraryCache::stats)
    }

    fn library(&self, artifact: &str) -> CqlResult<Arc<ElmLibrary>> {
        match &self.cache {
            Some(cache) => cache.get_or_parse(artifact),
            None => ElmLibrary::parse(artifact).map(Arc::new),
        }
    }
}

impl Default for ElmOracle {
    fn default() -> Self {
        Self::new(&CqlConfig::default())
    }
}

impl CompiledLogicOracle for ElmOracle {
    fn check_artifact(&self, artifact: &str) -> CqlResult<()> {
        self.library(artifact).map(|_| ())
    }

    fn resolve(&self, artifact: &str, identifier: &str) -> CqlResult<ResolvedType> {
        let library = self.library(artifact)?;
        let resolved = match library.definition(identifier) {
            Some(def) => ResolvedType::Named(def.basis_type().unwrap_or_else(|| "Any".to_string())),
            None => ResolvedType::Unresolved,
        };
        tracing::debug!(identifier, resolved = %resolved, "Resolved CQL identifier");
        Ok(resolved)
    }

    fn name(&self) -> &'static str {
        "elm"
    }
}

/// Oracle backed by a fixed identifier -> type table.
///
/// The artifact text is only checked for presence.
#[derive(Debug, Clone, Default)]
pub struct TypeTableOracle {
    types: HashMap<String, String>,
}

impl TypeTableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, identifier: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.types.insert(identifier.into(), type_name.into());
        self
    }
}

impl FromIterator<(String, String)> for TypeTableOracle {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

impl CompiledLogicOracle for TypeTableOracle {
    fn check_artifact(&self, artifact: &str) -> CqlResult<()> {
        if artifact.trim().is_empty() {
            return Err(CqlError::MissingArtifact);
        }
        Ok(())
    }

    fn resolve(&self, artifact: &str, identifier: &str) -> CqlResult<ResolvedType> {
        self.check_artifact(artifact)?;
        Ok(self
            .types
            .get(identifier)
            .map_or(ResolvedType::Unresolved, |t| ResolvedType::Named(t.clone())))
    }

    fn name(&self) -> &'static str {
        "type-table"
    }
}
