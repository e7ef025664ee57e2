//! A measure JSON file mounted into an in-memory repository.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use octomeasure_core::Measure;
use octomeasure_db_memory::InMemoryMeasureRepository;
use octomeasure_storage::DynRepository;

pub struct MeasureFile {
    path: PathBuf,
    measure_id: String,
    repository: Arc<InMemoryMeasureRepository>,
}

impl MeasureFile {
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read measure file: {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;

        let repository = Arc::new(InMemoryMeasureRepository::new());
        let measure_id = repository
            .insert_json(value)
            .with_context(|| format!("Not a measure document: {}", path.display()))?;
        if measure_id.trim().is_empty() {
            anyhow::bail!("Measure in {} has no id", path.display());
        }
        tracing::debug!(path = %path.display(), measure_id = %measure_id, "Measure file loaded");

        Ok(Self {
            path: path.to_path_buf(),
            measure_id,
            repository,
        })
    }

    pub fn measure_id(&self) -> &str {
        &self.measure_id
    }

    pub fn repository(&self) -> DynRepository {
        self.repository.clone()
    }

    /// Current state of the measure, including unsaved-to-disk changes.
    pub fn current(&self) -> Option<Measure> {
        self.repository.get(&self.measure_id)
    }

    /// `true` once an operation has saved the measure.
    pub fn is_modified(&self) -> bool {
        self.repository.save_count() > 0
    }

    /// Writes the measure back when it was modified. Returns whether the
    /// file was written.
    pub fn write_back(&self) -> Result<bool> {
        if !self.is_modified() {
            return Ok(false);
        }
        let measure = self
            .current()
            .with_context(|| format!("Measure {} disappeared from memory", self.measure_id))?;
        let json = serde_json::to_string_pretty(&measure)?;
        fs::write(&self.path, json + "\n")
            .with_context(|| format!("Failed to write measure file: {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), measure_id = %self.measure_id, "Measure file written");
        Ok(true)
    }
}
