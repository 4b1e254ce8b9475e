//! Error taxonomy for the sync engine.
//!
//! Clamping an extrapolated amount is normal behaviour and never shows up here.

use thiserror::Error;

/// The store was read before the first snapshot was installed.
///
/// Readers treat this as "skip this pass", never as a fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("game state has not been synced yet")]
pub struct UninitializedStateError;

/// Failure reported by a [`Transport`](crate::sync::Transport) before any
/// response body was available (network down, request could not be built, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A server response that decoded fine but breaks a snapshot invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("{category} `{name}` appears more than once")]
    DuplicateName { category: &'static str, name: String },
    #[error("{field} of `{name}` is not a finite number")]
    NotFinite { name: String, field: &'static str },
    #[error("{field} of `{name}` is negative ({value})")]
    Negative {
        name: String,
        field: &'static str,
        value: f64,
    },
    #[error("resource `{name}` owns {owned} which exceeds its maximum {maximum}")]
    AboveMaximum { name: String, owned: f64, maximum: f64 },
    #[error("upgrade `{name}` has owned count {owned}, expected 0 or 1")]
    UpgradeCount { name: String, owned: u32 },
    #[error("`{name}` references unknown resource `{resource}`")]
    UnknownResource { name: String, resource: String },
}

/// A bootstrap or purchase round-trip that did not produce a usable snapshot.
///
/// Whenever this is reported the store is left exactly as it was.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    Invalid(#[from] SnapshotError),
}
