//! Bounded calculation history on top of a [`Storage`] backend.
//!
//! Storage failures are logged and swallowed: a broken or missing store
//! reads as an empty history and a failed save is skipped.

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::backend::Storage;
use super::record::CalculationHistory;

/// Storage key holding the JSON array of records.
pub const HISTORY_STORAGE_KEY: &str = "keiba-points-history";

/// Maximum number of records kept; older ones are dropped.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Calculation history, newest first.
pub struct HistoryStore {
    storage: Arc<dyn Storage>,
    max_entries: usize,
    /// Serializes read-modify-write cycles on the stored list
    write_lock: Mutex<()>,
}

impl HistoryStore {
    /// Create a store keeping at most [`MAX_HISTORY_ENTRIES`] records
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_max_entries(storage, MAX_HISTORY_ENTRIES)
    }

    pub fn with_max_entries(storage: Arc<dyn Storage>, max_entries: usize) -> Self {
        Self {
            storage,
            max_entries,
            write_lock: Mutex::new(()),
        }
    }

    /// Read all records, newest first. Returns an empty list on any failure.
    pub fn get_history(&self) -> Vec<CalculationHistory> {
        match self.load() {
            Ok(history) => history,
            Err(e) => {
                warn!("Failed to load history: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Prepend `record` and drop records beyond the limit.
    pub fn save_history(&self, record: CalculationHistory) {
        let id = record.id.clone();
        match self.save(record) {
            Ok(len) => debug!("Saved history record {} ({} stored)", id, len),
            Err(e) => warn!("Failed to save history record {}: {:#}", id, e),
        }
    }

    /// Remove all records.
    pub fn clear_history(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = self.storage.remove_item(HISTORY_STORAGE_KEY) {
            warn!("Failed to clear history: {:#}", e);
        }
    }

    fn load(&self) -> Result<Vec<CalculationHistory>> {
        let Some(content) = self.storage.get_item(HISTORY_STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&content).context("Corrupt history data")
    }

    fn save(&self, record: CalculationHistory) -> Result<usize> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut history = self.get_history();
        history.insert(0, record);
        history.truncate(self.max_entries);

        let content = serde_json::to_string(&history)?;
        self.storage.set_item(HISTORY_STORAGE_KEY, &content)?;

        Ok(history.len())
    }
}

/// Generate a record id from the current time and a random suffix.
///
/// Uniqueness is best effort; collisions are not detected.
pub fn generate_history_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: u64 = rand::thread_rng().gen_range(0..36u64.pow(8));
    format!("{}{}", to_base36(millis), to_base36(suffix))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
