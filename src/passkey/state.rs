//! Session state shared by all passkey operations.
//!
//! The orchestrator is the only writer. Consumers read a snapshot or subscribe
//! to changes through a `watch` receiver. Operations go through an admission
//! gate, so at most one of them runs per store at a time and callers that arrive
//! while another operation is in flight wait in FIFO order.

use super::types::Credential;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, watch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub loading: bool,
    pub error: Option<String>,
    pub credentials: Vec<Credential>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<SessionState>>,
    gate: Arc<Mutex<()>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state: Arc::new(state),
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    #[must_use]
    pub fn credentials(&self) -> Vec<Credential> {
        self.state.borrow().credentials.clone()
    }

    /// Waits for the admission gate, then marks the store busy and clears the
    /// previous error. The returned guard releases both when dropped.
    pub(crate) async fn acquire(&self) -> BusyGuard<'_> {
        let permit = self.gate.lock().await;
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        BusyGuard {
            store: self,
            _permit: permit,
        }
    }

    pub(crate) fn set_error(&self, message: String) {
        self.state.send_modify(|state| state.error = Some(message));
    }

    /// Replaces the whole credential list in one update.
    pub(crate) fn set_credentials(&self, credentials: Vec<Credential>) {
        self.state
            .send_modify(|state| state.credentials = credentials);
    }
}

/// Holds the admission gate and the loading flag for one operation. Dropping it
/// on any exit path, including a cancelled future, clears `loading`.
pub(crate) struct BusyGuard<'a> {
    store: &'a SessionStore,
    _permit: MutexGuard<'a, ()>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.store.state.send_modify(|state| state.loading = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn guard_sets_and_releases_loading() {
        let store = SessionStore::new();
        store.set_error("stale".to_string());
        assert!(!store.loading());

        {
            let _busy = store.acquire().await;
            assert!(store.loading());
            assert_eq!(store.error(), None);
            store.set_error("boom".to_string());
        }

        assert!(!store.loading());
        assert_eq!(store.error().as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn dropped_future_still_releases_loading() {
        let store = SessionStore::new();
        let pending = async {
            let _busy = store.acquire().await;
            std::future::pending::<()>().await;
        };
        let result = timeout(Duration::from_millis(20), pending).await;
        assert!(result.is_err());
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn gate_admits_one_operation_at_a_time() {
        let store = SessionStore::new();
        let first = store.acquire().await;
        let second = timeout(Duration::from_millis(20), store.acquire()).await;
        assert!(second.is_err(), "second operation entered while first held the gate");
        drop(first);
        let second = timeout(Duration::from_millis(200), store.acquire()).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        store.set_credentials(Vec::new());
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().credentials.is_empty());
    }
}
