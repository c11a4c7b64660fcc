use super::{RecordStore, StoreError};
use crate::catalog::ToolRecord;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process dataset, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ToolRecord>>,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ToolRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    /// Makes subsequent loads fail, simulating an unreadable dataset
    pub fn fail_loads(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<ToolRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Vec<ToolRecord>, StoreError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("load disabled".to_string()));
        }
        Ok(self.snapshot())
    }

    fn save(&self, records: &[ToolRecord]) -> Result<(), StoreError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("save disabled".to_string()));
        }
        let mut stored = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        *stored = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
