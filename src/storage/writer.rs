//! Debounced history writes.
//!
//! Rapid saves are coalesced: each [`DebouncedWriter::schedule`] replaces the
//! pending record and restarts the timer, so only the last record inside the
//! window is written. [`DebouncedWriter::flush`] writes the pending record
//! right away.
//!
//! States and transitions:
//!
//! ```text
//! Idle ──schedule──▶ Pending ──timer fires / flush──▶ Idle
//!                     │  ▲
//!                     └──┘ schedule (timer replaced)
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use super::history::HistoryStore;
use super::record::CalculationHistory;

/// Default debounce window
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

enum WriterState {
    Idle,
    Pending {
        record: CalculationHistory,
        timer: JoinHandle<()>,
        generation: u64,
    },
}

struct Inner {
    state: WriterState,
    generation: u64,
}

/// Coalescing writer in front of a [`HistoryStore`].
pub struct DebouncedWriter {
    store: Arc<HistoryStore>,
    delay: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl DebouncedWriter {
    pub fn new(store: Arc<HistoryStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            inner: Arc::new(Mutex::new(Inner {
                state: WriterState::Idle,
                generation: 0,
            })),
        }
    }

    /// Writer with the default 600 ms window
    pub fn with_default_delay(store: Arc<HistoryStore>) -> Self {
        Self::new(store, DEFAULT_DEBOUNCE)
    }

    /// Replace the pending record and restart the timer.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime, since the timer is a
    /// spawned task.
    pub fn schedule(&self, record: CalculationHistory) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if let WriterState::Pending { timer, .. } = &inner.state {
            timer.abort();
            debug!("Replacing pending history write");
        }

        inner.generation += 1;
        let generation = inner.generation;

        let timer = tokio::spawn({
            let store = Arc::clone(&self.store);
            let shared = Arc::clone(&self.inner);
            let delay = self.delay;
            async move {
                tokio::time::sleep(delay).await;
                // Let other ready work run before touching storage.
                tokio::task::yield_now().await;
                if let Some(record) = take_if_current(&shared, generation) {
                    store.save_history(record);
                }
            }
        });

        inner.state = WriterState::Pending {
            record,
            timer,
            generation,
        };
    }

    /// Write the pending record immediately.
    ///
    /// Returns `false` when nothing was pending.
    pub fn flush(&self) -> bool {
        let pending = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut inner.state, WriterState::Idle)
        };

        match pending {
            WriterState::Idle => false,
            WriterState::Pending { record, timer, .. } => {
                timer.abort();
                self.store.save_history(record);
                true
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        matches!(inner.state, WriterState::Pending { .. })
    }
}

/// Take the pending record if it still belongs to the timer of `generation`.
fn take_if_current(shared: &Mutex<Inner>, generation: u64) -> Option<CalculationHistory> {
    let mut inner = shared.lock().unwrap_or_else(|e| e.into_inner());

    match &inner.state {
        WriterState::Pending { generation: g, .. } if *g == generation => {}
        _ => return None,
    }

    match std::mem::replace(&mut inner.state, WriterState::Idle) {
        WriterState::Pending { record, .. } => Some(record),
        WriterState::Idle => None,
    }
}
