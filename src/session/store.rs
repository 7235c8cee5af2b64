// PlaylistStore - session state of the playlist client

use chrono::Datelike;
use log::{debug, info, warn};
use ringbuf::traits::Producer;
use std::sync::Arc;
use tokio::runtime::Handle;

use super::error::{StoreError, StoreResult};
use super::sync::{Reconciliation, SyncOutcome, SyncStatus, SyncTracker};
use crate::api::{ApiError, PlaylistApi};
use crate::command::{CommandError, SongCommand, TransactionStack};
use crate::config::ClientConfig;
use crate::messaging::{Notification, NotificationCategory, NotificationProducer};
use crate::model::{
    IdNamePair, NewPlaylist, Playlist, PlaylistId, PlaylistSort, PlaylistUpdate, Song,
};

/// Which modal dialog is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentModal {
    #[default]
    None,
    DeleteList,
    EditSong,
    Error,
}

/// Store settings taken from the client configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub history_limit: Option<usize>,
    pub verify_on_open: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            history_limit: None,
            verify_on_open: true,
        }
    }
}

impl From<&ClientConfig> for StoreOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            history_limit: config.history_limit,
            verify_on_open: config.verify_on_open,
        }
    }
}

/// Session state of the client: the open playlist, its edit history and the
/// listing and modal state around it
///
/// Edits are applied locally through the transaction stack and then written
/// to the server in the background. The store never waits for those writes;
/// call `process_sync_results` (or `settle`) to fold their responses back in.
///
/// # Threading
/// The store is driven from one task. Background writes run on the Tokio
/// runtime that was current when the store was created.
pub struct PlaylistStore {
    api: Arc<dyn PlaylistApi>,
    options: StoreOptions,
    transactions: TransactionStack,
    current_list: Option<Playlist>,
    editing: bool,
    id_name_pairs: Vec<IdNamePair>,
    all_playlists: Vec<Playlist>,
    /// `all_playlists` after the last search and sort
    filtered_playlists: Vec<Playlist>,
    current_modal: CurrentModal,
    current_song: Option<(usize, Song)>,
    list_marked_for_deletion: Option<Playlist>,
    new_list_counter: u32,
    list_name_active: bool,
    user_email: Option<String>,
    sync: SyncTracker,
    notifications: NotificationProducer,
}

impl PlaylistStore {
    /// Create a store on the current Tokio runtime
    ///
    /// # Errors
    /// `StoreError::NoRuntime` when called outside a runtime.
    pub fn new(
        api: Arc<dyn PlaylistApi>,
        options: StoreOptions,
        notifications: NotificationProducer,
    ) -> StoreResult<Self> {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let transactions = match options.history_limit {
            Some(limit) => TransactionStack::with_capacity(limit),
            None => TransactionStack::new(),
        };

        Ok(Self {
            api,
            options,
            transactions,
            current_list: None,
            editing: false,
            id_name_pairs: Vec::new(),
            all_playlists: Vec::new(),
            filtered_playlists: Vec::new(),
            current_modal: CurrentModal::None,
            current_song: None,
            list_marked_for_deletion: None,
            new_list_counter: 0,
            list_name_active: false,
            user_email: None,
            sync: SyncTracker::new(runtime),
            notifications,
        })
    }

    /// Set the email of the logged-in user (owner of lists created from now on)
    pub fn set_user_email(&mut self, email: Option<String>) {
        self.user_email = email;
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    // ---- Loading and navigation ----

    /// Open a playlist for editing
    ///
    /// With `verify_on_open` the playlist is written back unchanged before it
    /// is opened, so a list the user cannot save fails here rather than on
    /// the first edit. The edit history always starts empty: the server copy
    /// may not contain edits whose writes failed or are still in flight.
    pub async fn set_current_list(&mut self, id: &PlaylistId) -> StoreResult<()> {
        let api = Arc::clone(&self.api);
        let playlist = match api.get_playlist(id).await {
            Ok(playlist) => playlist,
            Err(err) => return Err(self.report_api_error("open playlist", err)),
        };

        if self.options.verify_on_open
            && let Err(err) = api
                .update_playlist(&playlist.id, &PlaylistUpdate::from(&playlist))
                .await
        {
            return Err(self.report_api_error("open playlist", err));
        }

        info!("Opened playlist {} \"{}\" for editing", playlist.id, playlist.name);
        self.open(playlist, true);
        Ok(())
    }

    /// Open a playlist read-only
    ///
    /// Viewing never touches the edit history; edits are rejected until the
    /// list is opened with `set_current_list`.
    pub async fn view_playlist(&mut self, id: &PlaylistId) -> StoreResult<()> {
        let api = Arc::clone(&self.api);
        let playlist = match api.get_playlist(id).await {
            Ok(playlist) => playlist,
            Err(err) => return Err(self.report_api_error("view playlist", err)),
        };

        info!("Viewing playlist {} \"{}\"", playlist.id, playlist.name);
        self.open(playlist, false);
        Ok(())
    }

    fn open(&mut self, playlist: Playlist, editing: bool) {
        if editing {
            self.transactions.clear();
        }
        self.sync.track(Some(&playlist));
        self.current_list = Some(playlist);
        self.editing = editing;
        self.current_modal = CurrentModal::None;
        self.current_song = None;
        self.list_name_active = false;
    }

    /// Forget the open playlist when leaving it for a listing screen
    fn leave_current_list(&mut self) {
        self.sync.track(None);
        self.current_list = None;
        self.editing = false;
        self.current_song = None;
        self.list_name_active = false;
    }

    /// Close the open playlist and drop its edit history
    pub fn close_current_list(&mut self) {
        if let Some(list) = &self.current_list {
            info!("Closed playlist {}", list.id);
        }
        self.leave_current_list();
        self.transactions.clear();
        self.current_modal = CurrentModal::None;
    }

    /// Create an empty `Untitled<N>` list owned by the logged-in user and open it
    pub async fn create_new_list(&mut self) -> StoreResult<()> {
        let Some(owner_email) = self.user_email.clone() else {
            return Err(self.reject_not_logged_in());
        };

        let request = NewPlaylist {
            name: format!("Untitled{}", self.new_list_counter),
            songs: Vec::new(),
            owner_email,
        };
        let api = Arc::clone(&self.api);
        let playlist = match api.create_playlist(&request).await {
            Ok(playlist) => playlist,
            Err(err) => return Err(self.report_api_error("create playlist", err)),
        };

        self.new_list_counter += 1;
        info!("Created playlist {} \"{}\"", playlist.id, playlist.name);
        self.open(playlist, true);
        Ok(())
    }

    /// Rename a playlist
    ///
    /// Renaming the playlist open for editing changes the local copy and
    /// persists it like any edit, so the new name is written after every
    /// earlier edit and the history is kept. Any other playlist is renamed on
    /// the server once pending writes have finished, then the listing is
    /// refreshed and the list opened for editing.
    pub async fn change_list_name(&mut self, id: &PlaylistId, name: &str) -> StoreResult<()> {
        if self.is_editing()
            && let Some(list) = self.current_list.as_mut()
            && list.id == *id
        {
            list.name = name.to_string();
            for pair in self.id_name_pairs.iter_mut().filter(|pair| pair.id == *id) {
                pair.name = name.to_string();
            }
            self.list_name_active = false;
            info!("Renamed playlist {} to \"{}\"", id, name);
            self.persist_current_list();
            return Ok(());
        }

        self.settle().await;
        let api = Arc::clone(&self.api);
        let mut playlist = match api.get_playlist(id).await {
            Ok(playlist) => playlist,
            Err(err) => return Err(self.report_api_error("rename playlist", err)),
        };

        playlist.name = name.to_string();
        if let Err(err) = api
            .update_playlist(id, &PlaylistUpdate::from(&playlist))
            .await
        {
            return Err(self.report_api_error("rename playlist", err));
        }
        info!("Renamed playlist {} to \"{}\"", id, name);

        self.load_id_name_pairs().await?;
        self.set_current_list(id).await
    }

    /// Load the logged-in user's id/name pairs; leaves the open playlist
    pub async fn load_id_name_pairs(&mut self) -> StoreResult<()> {
        let api = Arc::clone(&self.api);
        match api.get_playlist_pairs().await {
            Ok(pairs) => {
                debug!("Loaded {} id/name pairs", pairs.len());
                self.id_name_pairs = pairs;
                self.leave_current_list();
                Ok(())
            }
            Err(err) => Err(self.report_api_error("load playlists", err)),
        }
    }

    /// Load every playlist for browsing; leaves the open playlist
    pub async fn load_all_playlists(&mut self) -> StoreResult<()> {
        let api = Arc::clone(&self.api);
        match api.get_all_playlists().await {
            Ok(playlists) => {
                debug!("Loaded {} playlists", playlists.len());
                self.filtered_playlists = playlists.clone();
                self.all_playlists = playlists;
                self.leave_current_list();
                Ok(())
            }
            Err(err) => Err(self.report_api_error("load playlists", err)),
        }
    }

    /// Fetch a playlist and ask for confirmation before deleting it
    pub async fn mark_list_for_deletion(&mut self, id: &PlaylistId) -> StoreResult<()> {
        let api = Arc::clone(&self.api);
        let playlist = match api.get_playlist(id).await {
            Ok(playlist) => playlist,
            Err(err) => return Err(self.report_api_error("delete playlist", err)),
        };
        self.list_marked_for_deletion = Some(playlist);
        self.current_modal = CurrentModal::DeleteList;
        Ok(())
    }

    /// Delete a playlist and reload the browse listing
    pub async fn delete_list(&mut self, id: &PlaylistId) -> StoreResult<()> {
        let api = Arc::clone(&self.api);
        if let Err(err) = api.delete_playlist(id).await {
            return Err(self.report_api_error("delete playlist", err));
        }
        info!("Deleted playlist {}", id);

        if self.current_list.as_ref().is_some_and(|list| list.id == *id) {
            self.transactions.clear();
        }
        self.load_all_playlists().await
    }

    /// Filter the browse listing by `search` and order it by `sort`
    ///
    /// The search is a case-insensitive substring of the name or the owner's
    /// email; a blank search keeps every playlist.
    pub fn set_filtered_playlists(&mut self, search: &str, sort: PlaylistSort) {
        let mut filtered: Vec<Playlist> = self
            .all_playlists
            .iter()
            .filter(|playlist| playlist.matches_search(search))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| sort.compare(a, b));
        debug!(
            "Filtered {} of {} playlists by {:?}",
            filtered.len(),
            self.all_playlists.len(),
            search
        );
        self.filtered_playlists = filtered;
    }

    /// Delete the list marked by `mark_list_for_deletion` and close the modal
    pub async fn delete_marked_list(&mut self) -> StoreResult<()> {
        let Some(marked) = self.list_marked_for_deletion.take() else {
            return Err(StoreError::NothingMarked);
        };
        let result = self.delete_list(&marked.id).await;
        self.hide_modals();
        result
    }

    // ---- Edits ----

    /// Insert `song` at `index` of the open playlist
    pub fn add_create_song_transaction(&mut self, index: usize, song: Song) -> StoreResult<()> {
        self.submit(SongCommand::create(index, song))
    }

    /// Append the placeholder song to the open playlist
    pub fn add_new_song(&mut self) -> StoreResult<()> {
        let index = self.editable_list()?.len();
        let year = chrono::Local::now().year();
        self.add_create_song_transaction(index, Song::untitled(year))
    }

    /// Move the song at `start` to `end`
    pub fn add_move_song_transaction(&mut self, start: usize, end: usize) -> StoreResult<()> {
        self.submit(SongCommand::move_song(start, end))
    }

    /// Remove `song`, expected at `index`
    pub fn add_remove_song_transaction(&mut self, index: usize, song: Song) -> StoreResult<()> {
        self.submit(SongCommand::remove(index, song))
    }

    /// Overwrite the song at `index` with `new_fields`
    pub fn add_update_song_transaction(&mut self, index: usize, new_fields: Song) -> StoreResult<()> {
        let command = SongCommand::update(self.editable_list()?, index, new_fields);
        let command = match command {
            Ok(command) => command,
            Err(err) => return Err(self.reject_command(err)),
        };
        self.submit(command)
    }

    /// Undo the last edit and persist; `None` when there is nothing to undo
    pub fn undo(&mut self) -> StoreResult<Option<String>> {
        if !self.can_undo() {
            return Ok(None);
        }
        let Some(list) = self.current_list.as_mut() else {
            return Err(StoreError::NoCurrentList);
        };
        let undone = match self.transactions.undo(list) {
            Ok(undone) => undone,
            Err(err) => return Err(self.reject_command(err)),
        };
        if let Some(description) = &undone {
            info!("Undo: {}", description);
            self.persist_current_list();
        }
        Ok(undone)
    }

    /// Redo the last undone edit and persist; `None` when there is nothing to redo
    pub fn redo(&mut self) -> StoreResult<Option<String>> {
        if !self.can_redo() {
            return Ok(None);
        }
        let Some(list) = self.current_list.as_mut() else {
            return Err(StoreError::NoCurrentList);
        };
        let redone = match self.transactions.redo(list) {
            Ok(redone) => redone,
            Err(err) => return Err(self.reject_command(err)),
        };
        if let Some(description) = &redone {
            info!("Redo: {}", description);
            self.persist_current_list();
        }
        Ok(redone)
    }

    fn editable_list(&self) -> StoreResult<&Playlist> {
        match &self.current_list {
            None => Err(StoreError::NoCurrentList),
            Some(list) if !self.editing => Err(StoreError::ReadOnly(list.id.clone())),
            Some(list) => Ok(list),
        }
    }

    fn submit(&mut self, command: SongCommand) -> StoreResult<()> {
        let editable = self.editable_list().map(|_| ());
        if let Err(err) = editable {
            if let StoreError::ReadOnly(id) = &err {
                warn!("Rejected edit of read-only playlist {}", id);
                self.notify(Notification::warning(
                    NotificationCategory::Validation,
                    err.to_string(),
                ));
            }
            return Err(err);
        }
        let Some(list) = self.current_list.as_mut() else {
            return Err(StoreError::NoCurrentList);
        };

        let description = command.description();
        if let Err(err) = self.transactions.perform(command, list) {
            return Err(self.reject_command(err));
        }
        debug!("Performed: {}", description);
        self.persist_current_list();
        Ok(())
    }

    /// Write the open playlist to the server in the background
    ///
    /// Returns the request id, or `None` when no playlist is open.
    pub fn persist_current_list(&mut self) -> Option<u64> {
        let list = self.current_list.as_ref()?;
        Some(self.sync.dispatch(Arc::clone(&self.api), list))
    }

    // ---- Sync reconciliation ----

    /// Fold every background write response received so far into the
    /// session, returning how many were processed
    pub fn process_sync_results(&mut self) -> usize {
        let mut processed = 0;
        while let Some(outcome) = self.sync.try_next() {
            self.handle_sync_outcome(outcome);
            processed += 1;
        }
        processed
    }

    fn handle_sync_outcome(&mut self, outcome: SyncOutcome) {
        let reconciliation = self.sync.reconcile(&outcome);
        match (&outcome.result, reconciliation) {
            (_, Reconciliation::Foreign) => {
                debug!(
                    "Discarding sync #{} for playlist {}, no longer open",
                    outcome.request_id, outcome.playlist_id
                );
            }
            (Ok(_), Reconciliation::Stale) => {
                debug!("Sync #{} acknowledged after a newer one", outcome.request_id);
            }
            (Ok(_), Reconciliation::Applied) => {
                debug!("Sync #{} acknowledged", outcome.request_id);
            }
            (Err(err), reconciliation) => {
                warn!(
                    "Sync #{} of playlist {} failed: {}",
                    outcome.request_id, outcome.playlist_id, err
                );
                let category = if err.is_unauthorized() {
                    NotificationCategory::Auth
                } else {
                    NotificationCategory::Sync
                };
                self.notify(Notification::error(
                    category,
                    format!("Could not save playlist: {}", err),
                ));
                if reconciliation == Reconciliation::Applied {
                    self.current_modal = CurrentModal::Error;
                }
            }
        }
    }

    /// Wait for every background write and process the responses
    pub async fn settle(&mut self) -> usize {
        self.sync.wait_idle().await;
        self.process_sync_results()
    }

    pub fn sync_status(&self) -> &SyncStatus {
        self.sync.status()
    }

    /// Last copy of the open playlist the server confirmed
    pub fn acknowledged_list(&self) -> Option<&Playlist> {
        self.sync.acknowledged()
    }

    /// Whether the open playlist differs from the last confirmed copy
    pub fn has_unsynced_changes(&self) -> bool {
        match (&self.current_list, self.sync.acknowledged()) {
            (Some(current), Some(acknowledged)) => current != acknowledged,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Writes dispatched but not finished yet
    pub fn pending_syncs(&self) -> usize {
        self.sync.in_flight()
    }

    // ---- Queries ----

    pub fn current_list(&self) -> Option<&Playlist> {
        self.current_list.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.current_list.is_some() && self.editing
    }

    pub fn id_name_pairs(&self) -> &[IdNamePair] {
        &self.id_name_pairs
    }

    pub fn all_playlists(&self) -> &[Playlist] {
        &self.all_playlists
    }

    /// Browse listing as last filtered; every playlist right after loading
    pub fn filtered_playlists(&self) -> &[Playlist] {
        &self.filtered_playlists
    }

    pub fn list_marked_for_deletion(&self) -> Option<&Playlist> {
        self.list_marked_for_deletion.as_ref()
    }

    pub fn can_add_new_song(&self) -> bool {
        self.is_editing()
    }

    pub fn can_close(&self) -> bool {
        self.current_list.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.is_editing() && self.transactions.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.is_editing() && self.transactions.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.transactions.undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.transactions.redo_description()
    }

    // ---- Modals ----

    /// Open the edit dialog for the song at `index`
    pub fn show_edit_song_modal(&mut self, index: usize, song: Song) {
        self.current_song = Some((index, song));
        self.current_modal = CurrentModal::EditSong;
    }

    pub fn hide_modals(&mut self) {
        self.current_modal = CurrentModal::None;
        self.current_song = None;
        self.list_marked_for_deletion = None;
    }

    pub fn current_modal(&self) -> CurrentModal {
        self.current_modal
    }

    /// Song being edited in the edit dialog
    pub fn current_song(&self) -> Option<(usize, &Song)> {
        self.current_song.as_ref().map(|(index, song)| (*index, song))
    }

    pub fn is_delete_list_modal_open(&self) -> bool {
        self.current_modal == CurrentModal::DeleteList
    }

    pub fn is_edit_song_modal_open(&self) -> bool {
        self.current_modal == CurrentModal::EditSong
    }

    pub fn is_error_modal_open(&self) -> bool {
        self.current_modal == CurrentModal::Error
    }

    pub fn set_is_list_name_edit_active(&mut self) {
        self.list_name_active = true;
    }

    pub fn is_list_name_edit_active(&self) -> bool {
        self.list_name_active
    }

    // ---- Error reporting ----

    fn notify(&mut self, notification: Notification) {
        if let Err(dropped) = self.notifications.try_push(notification) {
            warn!("Notification queue full, dropped: {}", dropped);
        }
    }

    fn report_api_error(&mut self, action: &str, err: ApiError) -> StoreError {
        warn!("Failed to {}: {}", action, err);
        let category = if err.is_unauthorized() {
            NotificationCategory::Auth
        } else {
            NotificationCategory::Generic
        };
        self.notify(Notification::error(
            category,
            format!("Failed to {}: {}", action, err),
        ));
        StoreError::Api(err)
    }

    fn reject_command(&mut self, err: CommandError) -> StoreError {
        warn!("Rejected edit: {}", err);
        self.notify(Notification::warning(
            NotificationCategory::Validation,
            err.to_string(),
        ));
        StoreError::Command(err)
    }

    fn reject_not_logged_in(&mut self) -> StoreError {
        self.notify(Notification::error(
            NotificationCategory::Auth,
            "Log in to create playlists".to_string(),
        ));
        StoreError::NotLoggedIn
    }
}
