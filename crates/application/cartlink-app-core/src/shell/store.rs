use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use super::events::ShellEvent;
use super::reducer::{reduce, ShellState};

#[derive(Clone)]
pub struct ShellStore {
    inner: Arc<Mutex<ShellState>>,
}

impl Default for ShellStore {
    fn default() -> Self {
        Self::new(ShellState::default())
    }
}

impl ShellStore {
    pub fn new(state: ShellState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> ShellState {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn apply(&self, ev: ShellEvent) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let next = reduce(guard.clone(), ev);
        *guard = next;
    }

    /// Apply every event already waiting in `rx`.
    pub fn drain(&self, rx: &mut mpsc::Receiver<ShellEvent>) -> usize {
        let mut applied = 0;
        while let Ok(ev) = rx.try_recv() {
            self.apply(ev);
            applied += 1;
        }
        applied
    }
}
