//! Calculation history persistence
//!
//! Provides a bounded, newest-first list of past calculations stored as a
//! single JSON array under one storage key, plus a debounced writer that
//! coalesces rapid saves.

pub mod backend;
pub mod history;
pub mod record;
pub mod writer;

pub use backend::{FileStorage, MemoryStorage, Storage};
pub use history::{generate_history_id, HistoryStore, HISTORY_STORAGE_KEY, MAX_HISTORY_ENTRIES};
pub use record::{BetResult, CalculationHistory, SelectionMode};
pub use writer::{DebouncedWriter, DEFAULT_DEBOUNCE};
