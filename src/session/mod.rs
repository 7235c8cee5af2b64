// Client session for playlist editing
//
// Architecture:
// - PlaylistStore: owns the open playlist, its transaction history and the
//   listing/modal state; every edit goes perform -> persist
// - SyncTracker: fire-and-forget background writes tagged with request ids;
//   late or foreign responses are discarded instead of applied
//
// Edits are optimistic: a failed write is reported through the notification
// queue but the local change and its history entry are kept.

pub mod error;
pub mod store;
pub mod sync;

pub use error::{StoreError, StoreResult};
pub use store::{CurrentModal, PlaylistStore, StoreOptions};
pub use sync::{Reconciliation, SyncOutcome, SyncStatus, SyncTracker};
