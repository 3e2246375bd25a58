//! slicer-reconcile
//!
//! Selection reconciliation for one slicer widget. Decides, on every refresh,
//! click and host selection callback, what the committed domain and its
//! selection should be, and what to tell the host.
//!
//! Deterministic and single-threaded. All host interaction goes through the
//! [`Host`] capability passed into each entry point; nothing here blocks or
//! fails.

mod controller;
mod domain;
mod host;
pub mod lock;
mod state;

pub use controller::{ClickOutcome, Controller, RefreshDecision, RefreshOutcome, SyncOutcome};
pub use domain::CommittedDomain;
pub use host::{Host, SelectionHost, SelectionWrite};
pub use lock::{CardinalityDecision, LockChange};
pub use state::ReconcileState;
