// Background persistence of the open playlist
//
// Every edit sends the whole playlist document to the server without waiting
// for the previous write to finish. Writes can therefore complete out of order;
// the server keeps whichever document arrives last. On the client side each
// write carries a request id, and a response is only reconciled if it is newer
// than the last reconciled one and belongs to the playlist that is still open.

use log::{debug, warn};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{ApiResult, PlaylistApi};
use crate::model::{Playlist, PlaylistId, PlaylistUpdate};

/// Result of one background write
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub request_id: u64,
    pub playlist_id: PlaylistId,
    /// The document that was sent
    pub snapshot: Playlist,
    pub result: ApiResult<PlaylistId>,
}

/// Synchronization state of the open playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing sent since the playlist was opened
    Idle,
    /// At least one write is newer than the last reconciled response
    Pending,
    /// The newest write was acknowledged
    Synced,
    /// The newest reconciled write failed
    Failed(String),
}

/// How a response relates to the open playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Newest response so far; status and acknowledged copy updated
    Applied,
    /// A newer response was already reconciled
    Stale,
    /// The response is for a playlist that is no longer open
    Foreign,
}

/// Dispatches writes and tracks their responses
pub struct SyncTracker {
    runtime: Handle,
    outcome_tx: mpsc::UnboundedSender<SyncOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<SyncOutcome>,
    in_flight: Vec<JoinHandle<()>>,
    next_request_id: u64,
    tracked: Option<PlaylistId>,
    latest_issued: u64,
    latest_reconciled: u64,
    acknowledged: Option<Playlist>,
    status: SyncStatus,
}

impl SyncTracker {
    pub fn new(runtime: Handle) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            outcome_tx,
            outcome_rx,
            in_flight: Vec::new(),
            next_request_id: 0,
            tracked: None,
            latest_issued: 0,
            latest_reconciled: 0,
            acknowledged: None,
            status: SyncStatus::Idle,
        }
    }

    /// Start tracking `playlist`, as just loaded from the server
    ///
    /// Responses to every write issued before this call become stale, even
    /// if the same playlist is opened again.
    pub fn track(&mut self, playlist: Option<&Playlist>) {
        self.tracked = playlist.map(|p| p.id.clone());
        self.latest_issued = self.next_request_id;
        self.latest_reconciled = self.next_request_id;
        self.acknowledged = playlist.cloned();
        self.status = SyncStatus::Idle;
    }

    /// Send `playlist` to the server in the background and return the request id
    pub fn dispatch(&mut self, api: Arc<dyn PlaylistApi>, playlist: &Playlist) -> u64 {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        if self.tracked.as_ref() == Some(&playlist.id) {
            self.latest_issued = request_id;
            self.status = SyncStatus::Pending;
        }

        let tx = self.outcome_tx.clone();
        let snapshot = playlist.clone();
        let update = PlaylistUpdate::from(playlist);
        debug!(
            "Sync #{}: writing playlist {} ({} songs)",
            request_id,
            snapshot.id,
            snapshot.songs.len()
        );

        let handle = self.runtime.spawn(async move {
            let result = api.update_playlist(&snapshot.id, &update).await;
            let outcome = SyncOutcome {
                request_id,
                playlist_id: snapshot.id.clone(),
                snapshot,
                result,
            };
            // The tracker owns the receiver; if it is gone nobody is listening
            let _ = tx.send(outcome);
        });

        self.in_flight.retain(|h| !h.is_finished());
        self.in_flight.push(handle);
        request_id
    }

    /// Next response received so far, without waiting
    pub fn try_next(&mut self) -> Option<SyncOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    /// Fold a response into the tracked state
    pub fn reconcile(&mut self, outcome: &SyncOutcome) -> Reconciliation {
        if self.tracked.as_ref() != Some(&outcome.playlist_id) {
            return Reconciliation::Foreign;
        }
        if outcome.request_id <= self.latest_reconciled {
            return Reconciliation::Stale;
        }

        self.latest_reconciled = outcome.request_id;
        self.status = match &outcome.result {
            Ok(_) => {
                self.acknowledged = Some(outcome.snapshot.clone());
                if outcome.request_id >= self.latest_issued {
                    SyncStatus::Synced
                } else {
                    SyncStatus::Pending
                }
            }
            Err(err) => SyncStatus::Failed(err.to_string()),
        };
        Reconciliation::Applied
    }

    /// Wait for every write dispatched so far to finish
    pub async fn wait_idle(&mut self) {
        for handle in std::mem::take(&mut self.in_flight) {
            if let Err(err) = handle.await {
                warn!("Sync task ended abnormally: {}", err);
            }
        }
    }

    /// Number of writes still running
    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    /// Last copy of the tracked playlist the server confirmed
    pub fn acknowledged(&self) -> Option<&Playlist> {
        self.acknowledged.as_ref()
    }
}
