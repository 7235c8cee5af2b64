// Integration tests for the playlist store against the in-process backend
// Each test edits through the store and checks what the backend persisted

use playlister::api::{ApiError, LocalPlaylistApi};
use playlister::backend::{DatabaseManager, MemoryDatabase, NewUser, StoreController, UserId};
use playlister::messaging::{
    NotificationCategory, NotificationConsumer, create_notification_channel,
};
use playlister::model::{NewPlaylist, PlaylistId, Song};
use playlister::session::{PlaylistStore, StoreError, StoreOptions, SyncStatus};
use ringbuf::traits::Consumer;
use std::sync::Arc;

const OWNER_EMAIL: &str = "joe@example.com";
const OTHER_EMAIL: &str = "ann@example.com";

struct Backend {
    controller: Arc<StoreController>,
    owner: UserId,
    other: UserId,
}

async fn backend() -> Backend {
    let db = Arc::new(MemoryDatabase::new());
    let mut ids = Vec::new();
    for (first, email) in [("Joe", OWNER_EMAIL), ("Ann", OTHER_EMAIL)] {
        let user = db
            .create_user(NewUser {
                first_name: first.to_string(),
                last_name: "Tester".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        ids.push(user.id);
    }
    let other = ids.pop().unwrap();
    let owner = ids.pop().unwrap();

    Backend {
        controller: Arc::new(StoreController::new(db)),
        owner,
        other,
    }
}

impl Backend {
    fn store_for(
        &self,
        user: Option<&UserId>,
        email: Option<&str>,
        options: StoreOptions,
    ) -> (PlaylistStore, NotificationConsumer) {
        let api = Arc::new(LocalPlaylistApi::new(
            Arc::clone(&self.controller),
            user.cloned(),
        ));
        let (tx, rx) = create_notification_channel(32);
        let mut store = PlaylistStore::new(api, options, tx).unwrap();
        store.set_user_email(email.map(str::to_string));
        (store, rx)
    }

    fn owner_store(&self) -> (PlaylistStore, NotificationConsumer) {
        self.store_for(Some(&self.owner), Some(OWNER_EMAIL), StoreOptions::default())
    }

    async fn seed(&self, name: &str, titles: &[&str]) -> PlaylistId {
        let songs = titles.iter().map(|t| song(t)).collect();
        self.controller
            .create_playlist(
                Some(&self.owner),
                NewPlaylist {
                    name: name.to_string(),
                    songs,
                    owner_email: OWNER_EMAIL.to_string(),
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn stored_titles(&self, id: &PlaylistId) -> Vec<String> {
        self.controller
            .get_playlist(id)
            .await
            .unwrap()
            .songs
            .into_iter()
            .map(|s| s.title)
            .collect()
    }
}

fn song(title: &str) -> Song {
    Song::new(title, "Band", 1999, "abcdefghijk")
}

fn titles(store: &PlaylistStore) -> Vec<String> {
    store
        .current_list()
        .unwrap()
        .songs
        .iter()
        .map(|s| s.title.clone())
        .collect()
}

#[tokio::test]
async fn test_edit_session_persists_every_step() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A", "B", "C", "D"]).await;
    let (mut store, _rx) = backend.owner_store();

    store.set_current_list(&id).await.unwrap();
    assert!(store.is_editing());
    assert!(!store.can_undo());

    store.add_move_song_transaction(0, 2).unwrap();
    assert_eq!(titles(&store), ["B", "C", "A", "D"]);

    store.add_remove_song_transaction(3, song("D")).unwrap();
    store
        .add_update_song_transaction(0, Song::new("B2", "Band", 2001, "abcdefghijk"))
        .unwrap();
    store.add_create_song_transaction(1, song("E")).unwrap();
    assert_eq!(titles(&store), ["B2", "E", "C", "A"]);
    assert_eq!(
        store.undo_description().as_deref(),
        Some("Add \"E\" at position 2")
    );

    store.settle().await;
    assert_eq!(backend.stored_titles(&id).await, ["B2", "E", "C", "A"]);
    assert_eq!(store.sync_status(), &SyncStatus::Synced);

    // Undo everything, one durable step at a time
    while store.undo().unwrap().is_some() {}
    assert_eq!(titles(&store), ["A", "B", "C", "D"]);
    assert!(store.can_redo());
    store.settle().await;
    assert_eq!(backend.stored_titles(&id).await, ["A", "B", "C", "D"]);
    assert!(!store.has_unsynced_changes());
}

#[tokio::test]
async fn test_undo_then_new_edit_drops_redo() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A", "B"]).await;
    let (mut store, _rx) = backend.owner_store();
    store.set_current_list(&id).await.unwrap();

    store.add_create_song_transaction(2, song("C")).unwrap();
    store.add_create_song_transaction(3, song("D")).unwrap();
    store.undo().unwrap();
    store.undo().unwrap();
    assert!(store.can_redo());

    store.add_move_song_transaction(1, 0).unwrap();
    assert!(!store.can_redo());
    assert_eq!(store.redo().unwrap(), None);
    assert_eq!(titles(&store), ["B", "A"]);
}

#[tokio::test]
async fn test_close_clears_history() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A", "B"]).await;
    let (mut store, _rx) = backend.owner_store();

    store.set_current_list(&id).await.unwrap();
    store.add_move_song_transaction(0, 1).unwrap();
    assert!(store.can_undo());

    store.close_current_list();
    assert!(store.current_list().is_none());
    assert!(!store.can_close());

    store.settle().await;
    store.set_current_list(&id).await.unwrap();
    assert_eq!(titles(&store), ["B", "A"]);
    assert!(!store.can_undo());
    assert!(!store.can_redo());
}

#[tokio::test]
async fn test_rename_during_unsettled_edit_keeps_both() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A", "B"]).await;
    let (mut store, _rx) = backend.owner_store();
    store.set_current_list(&id).await.unwrap();

    store.add_move_song_transaction(0, 1).unwrap();
    store.change_list_name(&id, "Road trip").await.unwrap();
    assert_eq!(titles(&store), ["B", "A"]);
    assert_eq!(store.current_list().unwrap().name, "Road trip");
    assert!(store.can_undo());

    store.settle().await;
    let stored = backend.controller.get_playlist(&id).await.unwrap();
    assert_eq!(stored.name, "Road trip");
    assert_eq!(backend.stored_titles(&id).await, ["B", "A"]);
    assert_eq!(store.sync_status(), &SyncStatus::Synced);

    assert_eq!(
        store.undo().unwrap().as_deref(),
        Some("Move song from position 1 to 2")
    );
    assert_eq!(titles(&store), ["A", "B"]);
    store.settle().await;
    assert_eq!(backend.stored_titles(&id).await, ["A", "B"]);
}

#[tokio::test]
async fn test_reopen_after_unsettled_edit_starts_new_history() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A", "B"]).await;
    let (mut store, _rx) = backend.owner_store();

    store.set_current_list(&id).await.unwrap();
    store.add_move_song_transaction(0, 1).unwrap();
    store.load_id_name_pairs().await.unwrap();
    store.set_current_list(&id).await.unwrap();

    assert!(!store.can_undo());
    assert_eq!(store.undo().unwrap(), None);
    store.settle().await;
    assert_eq!(store.sync_status(), &SyncStatus::Idle);
}

#[tokio::test]
async fn test_history_does_not_leak_between_playlists() {
    let backend = backend().await;
    let first = backend.seed("First", &["A", "B"]).await;
    let second = backend.seed("Second", &["X", "Y"]).await;
    let (mut store, _rx) = backend.owner_store();

    store.set_current_list(&first).await.unwrap();
    store.add_move_song_transaction(0, 1).unwrap();

    store.set_current_list(&second).await.unwrap();
    assert!(!store.can_undo());
    assert_eq!(store.undo().unwrap(), None);
    assert_eq!(titles(&store), ["X", "Y"]);
}

#[tokio::test]
async fn test_create_new_list_starts_fresh() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A"]).await;
    let (mut store, _rx) = backend.owner_store();

    store.set_current_list(&id).await.unwrap();
    store.add_new_song().unwrap();
    store.create_new_list().await.unwrap();

    let list = store.current_list().unwrap();
    assert_eq!(list.name, "Untitled0");
    assert_eq!(list.owner_email, OWNER_EMAIL);
    assert!(list.songs.is_empty());
    assert!(!store.can_undo());

    store.load_id_name_pairs().await.unwrap();
    let names: Vec<&str> = store.id_name_pairs().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Mix", "Untitled0"]);
    assert!(store.current_list().is_none());
}

#[tokio::test]
async fn test_viewed_playlist_is_read_only() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A", "B"]).await;
    let (mut store, mut rx) = backend.store_for(None, None, StoreOptions::default());

    store.view_playlist(&id).await.unwrap();
    assert_eq!(titles(&store), ["A", "B"]);
    assert!(!store.is_editing());
    assert!(!store.can_add_new_song());
    assert!(store.can_close());

    assert_eq!(
        store.add_move_song_transaction(0, 1),
        Err(StoreError::ReadOnly(id.clone()))
    );
    assert_eq!(store.add_new_song(), Err(StoreError::ReadOnly(id.clone())));
    assert_eq!(titles(&store), ["A", "B"]);
    assert_eq!(store.pending_syncs(), 0);

    let notification = rx.try_pop().unwrap();
    assert_eq!(notification.category, NotificationCategory::Validation);
}

#[tokio::test]
async fn test_guest_cannot_create() {
    let backend = backend().await;
    let (mut store, mut rx) = backend.store_for(None, None, StoreOptions::default());

    assert_eq!(store.create_new_list().await, Err(StoreError::NotLoggedIn));
    assert_eq!(rx.try_pop().unwrap().category, NotificationCategory::Auth);
}

#[tokio::test]
async fn test_open_for_editing_rejected_for_non_owner() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A"]).await;
    let (mut store, mut rx) =
        backend.store_for(Some(&backend.other), Some(OTHER_EMAIL), StoreOptions::default());

    let err = store.set_current_list(&id).await.unwrap_err();
    assert!(matches!(err, StoreError::Api(ref e) if e.is_unauthorized()));
    assert!(store.current_list().is_none());
    assert_eq!(rx.try_pop().unwrap().category, NotificationCategory::Auth);
}

#[tokio::test]
async fn test_unauthorized_edit_is_kept_locally() {
    let backend = backend().await;
    let id = backend.seed("Mix", &["A", "B"]).await;
    let options = StoreOptions {
        verify_on_open: false,
        ..StoreOptions::default()
    };
    let (mut store, mut rx) = backend.store_for(Some(&backend.other), Some(OTHER_EMAIL), options);

    store.set_current_list(&id).await.unwrap();
    store.add_move_song_transaction(0, 1).unwrap();
    store.settle().await;

    // Optimistic: the local edit and its history survive the rejection
    assert_eq!(titles(&store), ["B", "A"]);
    assert!(store.can_undo());
    assert!(store.has_unsynced_changes());
    assert!(store.is_error_modal_open());
    assert!(matches!(store.sync_status(), SyncStatus::Failed(_)));
    assert_eq!(rx.try_pop().unwrap().category, NotificationCategory::Auth);

    assert_eq!(backend.stored_titles(&id).await, ["A", "B"]);
}

#[tokio::test]
async fn test_missing_playlist() {
    let backend = backend().await;
    let (mut store, _rx) = backend.owner_store();

    let err = store
        .set_current_list(&PlaylistId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Api(ApiError::NotFound(_))));
    assert!(store.current_list().is_none());
}

#[tokio::test]
async fn test_browse_and_delete() {
    let backend = backend().await;
    let keep = backend.seed("Keep", &["A"]).await;
    let drop = backend.seed("Drop", &[]).await;
    let (mut store, _rx) = backend.owner_store();

    store.load_all_playlists().await.unwrap();
    assert_eq!(store.all_playlists().len(), 2);

    store.delete_list(&drop).await.unwrap();
    let ids: Vec<&PlaylistId> = store.all_playlists().iter().map(|p| &p.id).collect();
    assert_eq!(ids, [&keep]);
}
