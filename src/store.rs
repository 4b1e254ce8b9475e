//! Holder of the current authoritative snapshot.
//!
//! The store is shared (via `Rc`) between the sync controller, which is the
//! only writer, and the render dispatcher. Everything runs on the UI thread,
//! so interior mutability without locks is enough. Replacement swaps one
//! `Rc<Snapshot>` for another: readers either see the old state or the new
//! one, never a mix.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::UninitializedStateError;
use crate::snapshot::Snapshot;

/// Session-level sync state. There is no stale or terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unsynced,
    Synced,
}

#[derive(Debug, Default)]
pub struct GameStore {
    current: RefCell<Option<Rc<Snapshot>>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `snapshot` as the current state, discarding the previous one.
    pub fn replace_snapshot(&self, snapshot: Snapshot) {
        *self.current.borrow_mut() = Some(Rc::new(snapshot));
    }

    pub fn current_snapshot(&self) -> Result<Rc<Snapshot>, UninitializedStateError> {
        self.current.borrow().clone().ok_or(UninitializedStateError)
    }

    pub fn is_initialized(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn session_state(&self) -> SessionState {
        if self.is_initialized() {
            SessionState::Synced
        } else {
            SessionState::Unsynced
        }
    }
}
