//! Serializes mutating calls against the remote store.

use crate::error::{SyncError, SyncResult};
use crate::store::SectionStore;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Proof that the holder owns the action lock. Dropping it releases the lock,
/// on success, on error and on early return alike.
#[derive(Debug)]
pub struct ActionGuard {
    _guard: OwnedMutexGuard<()>,
}

/// Owns the store handle and the action lock.
///
/// Reads go straight to [`store`](Self::store). Writes must hold an
/// [`ActionGuard`] from [`acquire`](Self::acquire) for the whole round trip.
#[derive(Clone)]
pub struct SyncCoordinator {
    store: Arc<dyn SectionStore>,
    action_lock: Arc<Mutex<()>>,
}

impl SyncCoordinator {
    pub fn new(store: Arc<dyn SectionStore>) -> Self {
        Self {
            store,
            action_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Takes the action lock without waiting.
    ///
    /// Returns [`SyncError::Busy`] while another mutation is in flight.
    pub fn acquire(&self) -> SyncResult<ActionGuard> {
        match Arc::clone(&self.action_lock).try_lock_owned() {
            Ok(guard) => Ok(ActionGuard { _guard: guard }),
            Err(_) => {
                debug!("action lock held, rejecting mutation");
                Err(SyncError::Busy)
            }
        }
    }

    /// Whether a mutation currently holds the lock.
    pub fn is_busy(&self) -> bool {
        self.action_lock.try_lock().is_err()
    }

    pub fn store(&self) -> &dyn SectionStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}
