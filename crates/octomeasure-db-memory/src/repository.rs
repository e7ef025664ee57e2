use async_trait::async_trait;
use octomeasure_core::Measure;
use octomeasure_storage::{MeasureRepository, StorageError};
use papaya::HashMap as PapayaHashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory measure repository using papaya lock-free HashMap.
///
/// Saves replace the stored aggregate wholesale (last writer wins). The
/// repository counts successful saves so callers can assert that a rejected
/// operation never reached storage.
#[derive(Debug)]
pub struct InMemoryMeasureRepository {
    data: Arc<PapayaHashMap<String, Measure>>,
    save_count: AtomicU64,
}

impl InMemoryMeasureRepository {
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            save_count: AtomicU64::new(0),
        }
    }

    /// Creates a repository seeded with the given measures.
    pub fn with_measures(measures: impl IntoIterator<Item = Measure>) -> Self {
        let repo = Self::new();
        for measure in measures {
            repo.insert(measure);
        }
        repo
    }

    /// Seeds a measure without counting it as a save.
    pub fn insert(&self, measure: Measure) {
        let guard = self.data.pin();
        guard.insert(measure.id.clone(), measure);
    }

    /// Seeds a measure from its persisted JSON form.
    pub fn insert_json(&self, value: Value) -> Result<String, StorageError> {
        let measure: Measure = serde_json::from_value(value)?;
        let id = measure.id.clone();
        self.insert(measure);
        Ok(id)
    }

    /// Snapshot of a stored measure.
    pub fn get(&self, id: &str) -> Option<Measure> {
        let guard = self.data.pin();
        guard.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful `save_measure` calls.
    pub fn save_count(&self) -> u64 {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryMeasureRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeasureRepository for InMemoryMeasureRepository {
    async fn load_measure(&self, id: &str) -> Result<Option<Measure>, StorageError> {
        Ok(self.get(id))
    }

    async fn save_measure(&self, measure: &Measure) -> Result<Measure, StorageError> {
        if measure.id.trim().is_empty() {
            return Err(StorageError::internal("cannot save a measure without an id"));
        }
        let guard = self.data.pin();
        guard.insert(measure.id.clone(), measure.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(measure_id = %measure.id, "Measure saved to memory");
        Ok(measure.clone())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
